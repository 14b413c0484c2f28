//! Settings for crform.
//!
//! This module provides the [`Settings`] struct, which holds the display
//! patterns used by date/time fields and the error display class, and
//! [`GlobalSettings`], the process-wide instance behind [`SETTINGS`].
//!
//! Settings are injected: every constructor that depends on them has a
//! `*_with(&Settings)` form. The convenience constructors take a snapshot of
//! [`SETTINGS`] at construction time, so reconfiguring affects fields built
//! afterwards and never rewrites values already stored in a field.

use std::sync::{OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// The complete set of crform settings.
///
/// # Examples
///
/// ```
/// use crform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.format_date, "dd.MM.yyyy");
/// assert_eq!(settings.error_class, "b-danger");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Date/time display ────────────────────────────────────────────

    /// Display pattern for date-time fields.
    pub format_datetime: String,
    /// Display pattern for date fields.
    pub format_date: String,
    /// Input mask for date-time fields.
    pub mask_datetime: String,
    /// Input mask for date fields.
    pub mask_date: String,

    // ── Display ──────────────────────────────────────────────────────

    /// Class name reported by invalid fields for error display.
    pub error_class: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
    /// Whether to emit human-readable rather than JSON logs.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format_datetime: "dd.MM.yyyy HH:mm".to_string(),
            format_date: "dd.MM.yyyy".to_string(),
            mask_datetime: "__.__.____ __:__".to_string(),
            mask_date: "__.__.____".to_string(),
            error_class: "b-danger".to_string(),
            log_level: "info".to_string(),
            debug: true,
        }
    }
}

/// A process-wide, reconfigurable settings container.
///
/// Unlike a write-once cell, the settings may be replaced at any point.
/// Readers take a snapshot with [`get`](GlobalSettings::get).
pub struct GlobalSettings {
    inner: OnceLock<RwLock<Settings>>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalSettings {
    /// Creates a container that lazily starts from [`Settings::default`].
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    fn lock(&self) -> &RwLock<Settings> {
        self.inner.get_or_init(|| RwLock::new(Settings::default()))
    }

    /// Returns a snapshot of the current settings.
    pub fn get(&self) -> Settings {
        self.lock()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current settings.
    pub fn configure(&self, settings: Settings) {
        *self.lock().write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Modifies the current settings in place.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) {
        let mut guard = self.lock().write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Restores the defaults.
    pub fn reset(&self) {
        self.configure(Settings::default());
    }
}

/// The global settings instance.
///
/// Call `SETTINGS.configure(settings)` (or `SETTINGS.update(..)`) to change
/// the patterns used by subsequently constructed fields.
pub static SETTINGS: GlobalSettings = GlobalSettings::new();
