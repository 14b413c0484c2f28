//! Two-part field error messages.
//!
//! A field reports one message built from two independent slots: the
//! message produced by its own rules, and a message set from outside (for
//! example a server-side check echoed back onto the form). Writing one slot
//! never disturbs the other. The rendered form joins the present parts with
//! [`SEPARATOR`].

use std::fmt;

/// Separator placed between the validation and external parts.
pub const SEPARATOR: &str = " | ";

/// The error state of a single field.
///
/// # Examples
///
/// ```
/// use crform_forms::field_error::FieldError;
///
/// let mut err = FieldError::default();
/// err.set_validation("Minimum length: 3");
/// err.set_external("Login is taken");
/// assert_eq!(err.to_string(), "Minimum length: 3 | Login is taken");
///
/// err.set_validation("");
/// assert_eq!(err.to_string(), "Login is taken");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldError {
    validation: Option<String>,
    external: Option<String>,
}

impl FieldError {
    /// Sets the message produced by the field's own rules. An empty message
    /// clears the slot.
    pub fn set_validation(&mut self, message: impl Into<String>) {
        self.validation = non_empty(message.into());
    }

    /// Sets the externally supplied message. An empty message clears the slot.
    pub fn set_external(&mut self, message: impl Into<String>) {
        self.external = non_empty(message.into());
    }

    /// Clears the validation slot.
    pub fn clear_validation(&mut self) {
        self.validation = None;
    }

    /// Clears both slots.
    pub fn clear(&mut self) {
        self.validation = None;
        self.external = None;
    }

    /// The validation message, if any.
    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// The external message, if any.
    pub fn external(&self) -> Option<&str> {
        self.external.as_deref()
    }

    /// Returns `true` when neither slot holds a message.
    pub const fn is_empty(&self) -> bool {
        self.validation.is_none() && self.external.is_none()
    }

    /// Joins the present parts with [`SEPARATOR`].
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.validation, &self.external) {
            (Some(v), Some(e)) => write!(f, "{v}{SEPARATOR}{e}"),
            (Some(v), None) => write!(f, "{v}"),
            (None, Some(e)) => write!(f, "{e}"),
            (None, None) => Ok(()),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
