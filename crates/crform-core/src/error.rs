//! Core error types for crform.
//!
//! Only configuration mistakes are errors. A value that fails a field's
//! rules is not an error: it is recorded on the field as tri-state validity
//! plus a message, and the caller inspects that state.

use thiserror::Error;

/// The primary error type for crform.
///
/// Every variant describes a caller mistake that aborts the current call.
/// Validation failures never surface here.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Field configuration ──────────────────────────────────────────

    /// An option name passed to `configure()` is not an attribute of the field.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// A known option was given a value of the wrong type.
    #[error("Invalid value for option '{option}': expected {expected}")]
    InvalidOption {
        /// The option name.
        option: String,
        /// A description of the accepted value.
        expected: &'static str,
    },

    /// A regular expression supplied through configuration did not compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// An object value assigned to a select-object field lacks the key
    /// the field returns.
    #[error("Field not found: returned key '{key}' is missing from the value")]
    ReturnedKeyNotFound {
        /// The configured returned key.
        key: String,
    },

    // ── Settings ─────────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormError {
    /// Returns `true` for errors caused by field configuration, as opposed
    /// to settings loading.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::FieldNotFound(_)
                | Self::InvalidOption { .. }
                | Self::InvalidPattern(_)
                | Self::ReturnedKeyNotFound { .. }
        )
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_display() {
        let err = FormError::FieldNotFound("max_lenght".into());
        assert_eq!(err.to_string(), "Field not found: max_lenght");
    }

    #[test]
    fn test_returned_key_display() {
        let err = FormError::ReturnedKeyNotFound { key: "id".into() };
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_invalid_option_display() {
        let err = FormError::InvalidOption {
            option: "is_required".into(),
            expected: "a boolean",
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for option 'is_required': expected a boolean"
        );
    }

    #[test]
    fn test_is_configuration_error() {
        assert!(FormError::FieldNotFound("x".into()).is_configuration_error());
        assert!(FormError::ReturnedKeyNotFound { key: "id".into() }.is_configuration_error());
        assert!(FormError::InvalidPattern("(".into()).is_configuration_error());
        assert!(!FormError::ConfigurationError("x".into()).is_configuration_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormError = io_err.into();
        assert!(err.to_string().contains("file missing"));
        assert!(!err.is_configuration_error());
    }
}
