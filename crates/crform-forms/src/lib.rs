//! # crform-forms
//!
//! Form fields for crform. Provides typed fields with input masking, value
//! coercion and validation, list fields of repeated sub-forms, and the
//! [`Form`] aggregate that bulk-assigns values, distributes external errors,
//! and validates its members as a unit.
//!
//! Validation failures are field state, never errors: every field carries a
//! tri-state validity and a two-part message. Only configuration mistakes
//! return [`FormError`](crform_core::FormError).

pub mod contract;
pub mod datetime;
pub mod field_error;
pub mod fields;
pub mod form;
pub mod list_field;
pub mod mask;
pub mod presets;
pub mod validation;

pub use contract::{FieldContract, Validity};
pub use field_error::FieldError;
pub use fields::{
    DateTimeConfig, DecimalConfig, FieldKind, FormField, NumberConfig, SelectConfig,
    SelectObjectConfig, StringConfig,
};
pub use form::{Form, FormEntry, TypedField};
pub use list_field::ListField;
pub use validation::full_clean;
