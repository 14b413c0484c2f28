//! Whole-form validation for an external submitter.
//!
//! [`full_clean`] runs [`Form::check_valid`] and returns either the
//! submission mapping or every error message keyed by member name. Errors
//! accumulate rather than short-circuiting, so all problems are reported at
//! once.

use std::collections::BTreeMap;

use crform_core::Value;

use crate::contract::FieldContract;
use crate::form::Form;

/// Validates `form` and returns its submission values.
///
/// # Errors
///
/// Returns a map from member name to rendered error message when the form
/// is invalid. The map includes every invalid typed member and every error
/// the form holds under an unmatched key.
pub fn full_clean(form: &mut Form) -> Result<BTreeMap<String, Value>, BTreeMap<String, String>> {
    if form.check_valid() {
        Ok(form.value_fields())
    } else {
        Err(collect_errors(form))
    }
}

/// Gathers the rendered errors of invalid typed members plus the form-level
/// errors.
///
/// An invalid member without a message (an empty required list, for
/// example) is reported with an empty string.
pub fn collect_errors(form: &Form) -> BTreeMap<String, String> {
    let mut errors: BTreeMap<String, String> = form
        .typed_fields()
        .filter(|(_, field)| field.validity() == Some(false))
        .map(|(name, field)| (name.to_string(), field.error()))
        .collect();
    for (key, message) in form.errors() {
        errors.entry(key.clone()).or_insert_with(|| message.clone());
    }
    errors
}

/// Returns the submission values as JSON.
pub fn values_as_json(form: &Form) -> serde_json::Value {
    serde_json::Value::Object(
        form.value_fields()
            .into_iter()
            .map(|(k, v)| (k, v.to_json()))
            .collect(),
    )
}
