//! # crform-core
//!
//! Core types for crform: the dynamic field [`Value`], settings, the settings
//! loader, error types, and logging. This crate has no form logic and provides
//! the foundation for `crform-forms`.
//!
//! ## Modules
//!
//! - [`value`] - The dynamic value type held by fields and forms
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Display patterns and the process-wide settings instance
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult};
pub use settings::{GlobalSettings, Settings, SETTINGS};
pub use value::Value;
