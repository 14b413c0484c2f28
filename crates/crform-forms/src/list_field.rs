//! List fields: an ordered collection of sub-forms.
//!
//! A [`ListField`] holds several instances of the same form, such as the
//! rows of a repeated "phone numbers" block, and validates them together.
//! Its validity is never cached: every read re-checks each sub-form.

use std::collections::BTreeMap;

use crform_core::{FormError, FormResult, Value};

use crate::contract::{FieldContract, Validity};
use crate::field_error::FieldError;
use crate::form::Form;

/// An ordered sequence of sub-forms with aggregate validity.
#[derive(Debug, Clone)]
pub struct ListField {
    items: Vec<Form>,
    template: Option<Box<Form>>,
    is_required: bool,
    forced_invalid: bool,
    validity: Validity,
    error: FieldError,
}

impl Default for ListField {
    fn default() -> Self {
        Self::new()
    }
}

impl ListField {
    /// Creates an empty, required list.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            template: None,
            is_required: true,
            forced_invalid: false,
            validity: None,
            error: FieldError::default(),
        }
    }

    /// Sets whether at least one sub-form is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self.validity = self.empty_validity();
        self
    }

    /// Sets the form cloned for every row assigned through
    /// [`set_value`](Self::set_value).
    #[must_use]
    pub fn with_template(mut self, template: Form) -> Self {
        self.template = Some(Box::new(template));
        self
    }

    /// Appends a sub-form.
    pub fn push(&mut self, form: Form) {
        self.items.push(form);
        self.forced_invalid = false;
    }

    /// Removes the sub-form at `index`. Returns `None` when out of range.
    pub fn delete(&mut self, index: usize) -> Option<Form> {
        if index >= self.items.len() {
            return None;
        }
        self.forced_invalid = false;
        Some(self.items.remove(index))
    }

    /// Removes every sub-form.
    pub fn clear(&mut self) {
        self.items.clear();
        self.forced_invalid = false;
        self.validity = self.empty_validity();
    }

    /// Returns the number of sub-forms.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the list holds no sub-forms.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the sub-forms in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Form> {
        self.items.iter()
    }

    /// Returns the sub-form at `index`.
    pub fn get(&self, index: usize) -> Option<&Form> {
        self.items.get(index)
    }

    /// Returns the sub-form at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Form> {
        self.items.get_mut(index)
    }

    /// Whether at least one sub-form is required.
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    const fn empty_validity(&self) -> Validity {
        if self.forced_invalid {
            Some(false)
        } else if self.is_required {
            None
        } else {
            Some(true)
        }
    }

    /// Re-checks every sub-form and returns the aggregate validity.
    ///
    /// Every sub-form is checked, even after one fails, so each keeps its
    /// per-field state current.
    pub fn is_valid(&mut self) -> Validity {
        self.validity = if self.items.is_empty() {
            self.empty_validity()
        } else {
            let valid = self
                .items
                .iter_mut()
                .fold(true, |acc, form| form.check_valid() && acc);
            Some(valid)
        };
        self.validity
    }

    /// Each sub-form's [`value_fields`](Form::value_fields) as an object.
    pub fn value_clear(&self) -> Value {
        Value::List(
            self.items
                .iter()
                .map(|form| Value::Object(form.value_fields()))
                .collect(),
        )
    }

    /// Replaces the sub-forms with one per object in `value`.
    ///
    /// Each row is built from the template when one is set, or as a form of
    /// plain values otherwise. Null or an empty list removes every row.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidOption`] when `value` is not a list of
    /// objects, and propagates errors from the rows' own setters.
    pub fn set_value(&mut self, value: Value) -> FormResult<()> {
        if value.is_empty() {
            self.clear();
            return Ok(());
        }
        let Value::List(rows) = value else {
            return Err(not_a_list());
        };
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(map) = row else {
                return Err(not_a_list());
            };
            items.push(self.build_row(map)?);
        }
        self.items = items;
        self.forced_invalid = false;
        tracing::debug!(rows = self.items.len(), "list rebuilt");
        Ok(())
    }

    fn build_row(&self, map: BTreeMap<String, Value>) -> FormResult<Form> {
        let mut form = self
            .template
            .as_deref()
            .cloned()
            .unwrap_or_default();
        form.set_fields(map)?;
        Ok(form)
    }

    /// The rendered error message.
    pub fn error(&self) -> String {
        self.error.render()
    }

    /// Sets the external part of the error message; empty clears it.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error.set_external(message);
    }
}

fn not_a_list() -> FormError {
    FormError::InvalidOption {
        option: "value".to_string(),
        expected: "a list of objects",
    }
}

impl FieldContract for ListField {
    fn current_value(&self) -> Value {
        self.value_clear()
    }

    fn set_raw_value(&mut self, value: Value) -> FormResult<()> {
        self.set_value(value)
    }

    fn cleared_value(&self) -> Value {
        self.value_clear()
    }

    fn revalidate(&mut self) -> Validity {
        self.is_valid()
    }

    fn validity(&self) -> Validity {
        self.validity
    }

    fn force_validity(&mut self, validity: Validity) {
        self.forced_invalid = validity == Some(false);
        self.validity = validity;
    }

    fn required(&self) -> bool {
        self.is_required
    }

    fn set_external_error(&mut self, message: &str) {
        self.set_error(message);
    }
}

impl<'a> IntoIterator for &'a ListField {
    type Item = &'a Form;
    type IntoIter = std::slice::Iter<'a, Form>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
