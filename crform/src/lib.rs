//! # crform
//!
//! Form field modelling for client-side input: masked string entry, typed
//! numeric and date coercion, tri-state validation, and form aggregation.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `crform` to get everything, or depend on individual
//! crates for finer-grained control.

/// Value type, settings, error types, and logging.
pub use crform_core as core;

/// Fields, list fields, forms, masks, and the validation pipeline.
#[cfg(feature = "forms")]
pub use crform_forms as forms;

pub use crform_core::{FormError, FormResult, Settings, Value, SETTINGS};

#[cfg(feature = "forms")]
pub use crform_forms::{FieldContract, Form, FormEntry, FormField, ListField, TypedField};

/// Date types held by [`Value::Date`] and [`Value::DateTime`].
pub use chrono;

/// JSON values produced by [`Value::to_json`] and accepted by `Value::from`.
pub use serde_json;
