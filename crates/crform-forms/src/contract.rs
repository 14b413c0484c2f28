//! The validation contract shared by everything a form can hold.

use crform_core::{FormResult, Value};

/// Tri-state validity: `Some(true)` valid, `Some(false)` invalid, `None`
/// not yet evaluated (an empty required field before anyone validated it).
pub type Validity = Option<bool>;

/// The interface a [`Form`](crate::form::Form) uses to drive a typed member.
///
/// Implemented by [`FormField`](crate::fields::FormField),
/// [`ListField`](crate::list_field::ListField), and the
/// [`TypedField`](crate::form::TypedField) handle that wraps either.
pub trait FieldContract {
    /// The raw, display-oriented value.
    fn current_value(&self) -> Value;

    /// Assigns a raw value, normalizing and revalidating as the field does.
    fn set_raw_value(&mut self, value: Value) -> FormResult<()>;

    /// The submission-ready value.
    fn cleared_value(&self) -> Value;

    /// Re-runs the field's rules and returns the resulting validity.
    fn revalidate(&mut self) -> Validity;

    /// The last computed validity.
    fn validity(&self) -> Validity;

    /// Overrides the validity without running any rule.
    fn force_validity(&mut self, validity: Validity);

    /// Whether an answer is required.
    fn required(&self) -> bool;

    /// Sets the externally supplied part of the error message.
    fn set_external_error(&mut self, message: &str);
}
