//! Form fields: value normalization and validation.
//!
//! A [`FormField`] owns a raw value and keeps its tri-state validity and
//! error message current: every assignment normalizes the value (masks,
//! date parsing, time clamping) and re-runs the rules of the field's
//! [`FieldKind`].
//!
//! Validation is ordered. The base rule runs first: an empty answer (that is
//! not a deliberate zero) is valid only when the field is optional. If the
//! base rule fails, nothing else runs. Each kind then adds its own checks and
//! stops at the first failure.
//!
//! Field kinds are a closed set. Variants such as e-mail or phone are
//! configuration presets of [`FieldKind::String`]; see [`crate::presets`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crform_core::{FormError, FormResult, Settings, Value, SETTINGS};

use crate::contract::{FieldContract, Validity};
use crate::datetime::{self, DatePattern, ISO_DATE, ISO_DATETIME};
use crate::field_error::FieldError;
use crate::mask;

/// Message for a required field without an answer.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for a select field without a selection.
pub const CHOOSE_MESSAGE: &str = "You must choose a value.";

/// Message for a number field holding something that is not a number.
pub const NOT_A_NUMBER_MESSAGE: &str = "Enter a number.";

/// Options every field accepts in [`FormField::configure`].
const COMMON_OPTIONS: &[&str] = &["default_value", "is_required", "have_empty_value"];

/// Compiles `pattern` so that it must match the whole value.
pub fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

// ============================================================
// Kind configurations
// ============================================================

/// Rules for string fields, including masked entry.
#[derive(Debug, Clone, Default)]
pub struct StringConfig {
    /// Minimum length, counted after mask literals are stripped.
    pub min_length: Option<usize>,
    /// Maximum length, counted after mask literals are stripped.
    pub max_length: Option<usize>,
    /// Pattern the raw value must match in full.
    pub regex: Option<Regex>,
    /// Example shown when the pattern does not match.
    pub example: String,
    /// Input mask; empty for none.
    pub mask: String,
    /// Whether the cleared value keeps the mask literals.
    pub return_with_mask: bool,
    /// Clamp `HH:mm` entry to 23 hours and 59 minutes.
    pub clamp_time: bool,
}

impl StringConfig {
    /// A string field without any rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum length.
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the pattern. Compile it with [`full_match`] for whole-value matching.
    #[must_use]
    pub fn regex(mut self, regex: Regex) -> Self {
        self.regex = Some(regex);
        self
    }

    /// Sets the example text used in the pattern error.
    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Sets the input mask.
    #[must_use]
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Sets whether the cleared value keeps the mask literals.
    #[must_use]
    pub const fn return_with_mask(mut self, keep: bool) -> Self {
        self.return_with_mask = keep;
        self
    }

    fn normalize(&self, current: &Value, incoming: Value) -> Value {
        if self.mask.is_empty() || is_falsy(&incoming) {
            return incoming;
        }
        let text = incoming.to_text();
        let current = current.to_text();
        if !self.clamp_time {
            return Value::String(mask::normalize(&current, &text, &self.mask));
        }
        if text.chars().count() < current.chars().count() {
            return Value::String(text);
        }
        let clean = clamp_time_digits(&mask::strip(&text, &self.mask));
        if clean.is_empty() {
            return Value::String(String::new());
        }
        Value::String(mask::apply(&clean, &self.mask))
    }

    fn length_of(&self, text: &str) -> usize {
        if self.mask.is_empty() {
            text.chars().count()
        } else {
            mask::strip(text, &self.mask).chars().count()
        }
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        let text = value.to_text();
        let len = self.length_of(&text);
        if let Some(min) = self.min_length {
            if len < min {
                return Err(format!("Minimum length: {min}"));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!("Maximum length: {max}"));
            }
        }
        if let Some(re) = &self.regex {
            if !re.is_match(&text) {
                return Err(example_hint(&self.example));
            }
        }
        Ok(())
    }

    fn cleared(&self, value: &Value, have_empty_value: bool) -> Value {
        if self.return_with_mask {
            return if value.is_empty() {
                Value::Null
            } else {
                value.clone()
            };
        }
        let text = value.to_text();
        let stripped = if self.mask.is_empty() {
            text
        } else {
            mask::strip(&text, &self.mask)
        };
        if stripped.is_empty() && !have_empty_value {
            Value::Null
        } else {
            Value::String(stripped)
        }
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberConfig {
    /// Lower bound; `None` for unbounded.
    pub min: Option<f64>,
    /// Upper bound; `None` for unbounded.
    pub max: Option<f64>,
    /// Example shown with format errors.
    pub example: String,
}

impl NumberConfig {
    /// An unbounded number.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower bound.
    #[must_use]
    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the example text.
    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Checks the shape, then `min`, then `max`.
    fn check(&self, value: &Value, decimal: bool) -> Result<f64, String> {
        let n = match value {
            Value::Int(_) | Value::Float(_) => value.as_number().ok_or(NOT_A_NUMBER_MESSAGE)?,
            Value::String(s) => {
                if s.is_empty() {
                    return Err(REQUIRED_MESSAGE.to_string());
                }
                if decimal && s.matches('.').count() > 1 {
                    return Err("Only one decimal point is allowed.".to_string());
                }
                let shape = if decimal {
                    &*crate::presets::DECIMAL_SHAPE
                } else {
                    &*crate::presets::INTEGER_SHAPE
                };
                if !shape.is_match(s) {
                    return Err(with_example(NOT_A_NUMBER_MESSAGE, &self.example));
                }
                s.parse::<f64>()
                    .map_err(|_| with_example(NOT_A_NUMBER_MESSAGE, &self.example))?
            }
            _ => return Err(with_example(NOT_A_NUMBER_MESSAGE, &self.example)),
        };
        if let Some(min) = self.min {
            if n < min {
                return Err(format!("Minimum: {min}"));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(format!("Maximum: {max}"));
            }
        }
        Ok(n)
    }
}

/// A fixed-precision number with digit budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalConfig {
    /// Bounds and example.
    pub number: NumberConfig,
    /// Maximum digits after the decimal point.
    pub decimal_places: u32,
    /// Maximum significant digits, integer and fraction together.
    pub max_digits: u32,
}

impl DecimalConfig {
    /// A decimal with the given budgets and no bounds.
    pub fn new(max_digits: u32, decimal_places: u32) -> Self {
        Self {
            number: NumberConfig::new(),
            decimal_places,
            max_digits,
        }
    }

    /// Sets the bounds.
    #[must_use]
    pub fn bounds(mut self, number: NumberConfig) -> Self {
        self.number = number;
        self
    }

    fn check_digits(&self, value: &Value) -> Result<(), String> {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_text(),
        };
        let unsigned = text.trim_start_matches('-');
        let (int_part, frac) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };
        let int_digits = int_part.trim_start_matches('0').len();
        let int_budget = self.max_digits.saturating_sub(self.decimal_places) as usize;
        if int_digits > int_budget {
            return Err(format!(
                "Maximum {int_budget} digits before the decimal point."
            ));
        }
        if let Some(frac) = frac {
            if frac.is_empty() {
                return Err("Enter at least one digit after the decimal point.".to_string());
            }
            if frac.len() > self.decimal_places as usize {
                return Err(format!(
                    "Maximum {} digits after the decimal point.",
                    self.decimal_places
                ));
            }
            if int_digits + frac.len() > self.max_digits as usize {
                return Err(format!("Maximum {} digits in total.", self.max_digits));
            }
        }
        Ok(())
    }
}

/// A numeric selection id where zero means "nothing selected yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// The lowest id that counts as a selection.
    pub min: i64,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self { min: 1 }
    }
}

/// An object selection whose submission value is one of its keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectObjectConfig {
    /// The key of the held object emitted as the cleared value.
    pub returned_key: String,
}

impl SelectObjectConfig {
    /// Returns `key` from assigned objects.
    pub fn new(returned_key: impl Into<String>) -> Self {
        Self {
            returned_key: returned_key.into(),
        }
    }

    fn check(&self, value: &Value) -> FormResult<()> {
        match value.as_object() {
            Some(obj) if obj.contains_key(&self.returned_key) => Ok(()),
            _ => Err(FormError::ReturnedKeyNotFound {
                key: self.returned_key.clone(),
            }),
        }
    }
}

/// Display patterns for date and date-time fields.
#[derive(Debug, Clone)]
pub struct DateTimeConfig {
    /// The pattern values are displayed and validated in.
    pub display: DatePattern,
    /// The date part, used to locate `day`/`month`/`year`/`date`.
    pub date: DatePattern,
    /// The time part, used to locate `time`.
    pub time: DatePattern,
    /// Input mask offered to the UI.
    pub mask: String,
    /// Example shown when the value does not parse.
    pub example: String,
}

impl DateTimeConfig {
    /// Date-time patterns taken from `settings`.
    pub fn datetime(settings: &Settings) -> Self {
        let display = DatePattern::new(&settings.format_datetime);
        let time = datetime::time_part(&settings.format_datetime, &settings.format_date);
        Self {
            example: display.format(&sample_datetime()),
            display,
            date: DatePattern::new(&settings.format_date),
            time: DatePattern::new(&time),
            mask: settings.mask_datetime.clone(),
        }
    }

    /// Date patterns taken from `settings`.
    pub fn date(settings: &Settings) -> Self {
        let display = DatePattern::new(&settings.format_date);
        Self {
            example: display.format(&sample_datetime()),
            date: display.clone(),
            display,
            time: DatePattern::new(""),
            mask: settings.mask_date.clone(),
        }
    }

    fn normalize(&self, incoming: Value) -> Value {
        let Value::String(s) = incoming else {
            return incoming;
        };
        let parsed = if datetime::is_iso(&s) {
            datetime::parse_iso(&s)
        } else {
            self.display.parse(&s)
        };
        match parsed {
            Some(dt) => Value::String(self.display.format(&dt)),
            None => Value::String(s),
        }
    }

    fn parse(&self, value: &Value, accept_iso: bool) -> Option<NaiveDateTime> {
        match value {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => self
                .display
                .parse(s)
                .or_else(|| if accept_iso { datetime::parse_iso(s) } else { None }),
            _ => None,
        }
    }
}

fn sample_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 12, 26)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .unwrap_or_default()
}

/// The closed set of field kinds.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Only the base emptiness rule.
    Plain,
    /// Free text, optionally masked and pattern-checked.
    String(StringConfig),
    /// An integer-shaped number with bounds.
    Number(NumberConfig),
    /// A decimal number with bounds and digit budgets.
    Decimal(DecimalConfig),
    /// A numeric selection id.
    Select(SelectConfig),
    /// An object selection.
    SelectObject(SelectObjectConfig),
    /// A date and time in the display pattern.
    DateTime(DateTimeConfig),
    /// A date in the display pattern.
    Date(DateTimeConfig),
}

impl FieldKind {
    /// A short name for logs and debugging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Decimal(_) => "decimal",
            Self::Select(_) => "select",
            Self::SelectObject(_) => "select_object",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
        }
    }

    fn options(&self) -> &'static [&'static str] {
        match self {
            Self::Plain => &[],
            Self::String(_) => &[
                "min_length",
                "max_length",
                "regex",
                "example",
                "mask",
                "return_with_mask",
            ],
            Self::Number(_) => &["min", "max", "example"],
            Self::Decimal(_) => &["min", "max", "example", "decimal_places", "max_digits"],
            Self::Select(_) => &["min"],
            Self::SelectObject(_) => &["returned_key"],
            Self::DateTime(_) | Self::Date(_) => &["example", "mask"],
        }
    }

    const fn resets_empty_to_string(&self) -> bool {
        matches!(self, Self::String(_) | Self::DateTime(_) | Self::Date(_))
    }
}

enum Outcome {
    Valid,
    ValidEmpty,
    Invalid(String),
}

// ============================================================
// FormField
// ============================================================

/// A single named input slot with its own normalization and rules.
///
/// # Examples
///
/// ```
/// use crform_core::Value;
/// use crform_forms::fields::FormField;
///
/// let mut phone = FormField::phone();
/// phone.set_value("+79999999999").unwrap();
/// assert_eq!(phone.is_valid(), Some(true));
/// assert_eq!(phone.value_clear(), Value::from("+79999999999"));
/// ```
#[derive(Debug, Clone)]
pub struct FormField {
    value: Value,
    default_value: Value,
    is_required: bool,
    is_changed: bool,
    have_empty_value: bool,
    is_valid: Validity,
    error: FieldError,
    kind: FieldKind,
}

impl FormField {
    /// Creates a required field of the given kind with an empty default.
    pub fn new(kind: FieldKind) -> Self {
        let mut field = Self {
            value: Value::Null,
            default_value: Value::Null,
            is_required: true,
            is_changed: false,
            have_empty_value: false,
            is_valid: None,
            error: FieldError::default(),
            kind,
        };
        field.refresh_initial_validity();
        field
    }

    /// A field with only the base emptiness rule.
    pub fn plain() -> Self {
        Self::new(FieldKind::Plain)
    }

    /// A string field.
    pub fn string(config: StringConfig) -> Self {
        Self::new(FieldKind::String(config))
    }

    /// A number field accepting integer-shaped strings and numbers.
    pub fn number(config: NumberConfig) -> Self {
        Self::new(FieldKind::Number(config))
    }

    /// A decimal field.
    pub fn decimal(config: DecimalConfig) -> Self {
        Self::new(FieldKind::Decimal(config))
    }

    /// A select field, defaulting to the unselected id `0`.
    pub fn select() -> Self {
        Self::new(FieldKind::Select(SelectConfig::default())).with_default(0)
    }

    /// A select-object field returning `returned_key`, defaulting to an empty object.
    pub fn select_object(returned_key: impl Into<String>) -> Self {
        Self::new(FieldKind::SelectObject(SelectObjectConfig::new(returned_key)))
            .with_default(Value::Object(BTreeMap::new()))
    }

    /// A date-time field using the global settings.
    pub fn datetime() -> Self {
        Self::datetime_with(&SETTINGS.get())
    }

    /// A date-time field using the given settings.
    pub fn datetime_with(settings: &Settings) -> Self {
        Self::new(FieldKind::DateTime(DateTimeConfig::datetime(settings)))
    }

    /// A date field using the global settings.
    pub fn date() -> Self {
        Self::date_with(&SETTINGS.get())
    }

    /// A date field using the given settings.
    pub fn date_with(settings: &Settings) -> Self {
        Self::new(FieldKind::Date(DateTimeConfig::date(settings)))
    }

    // ── Builders ─────────────────────────────────────────────────────

    /// Sets whether an answer is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self.refresh_initial_validity();
        self
    }

    /// Sets the default value and makes it the current value.
    ///
    /// The default is normalized as if typed into an empty field. A
    /// select-object default lacking the returned key is rejected with a
    /// warning and the field is returned unchanged; use
    /// [`try_with_default`](Self::try_with_default) to get the error instead.
    #[must_use]
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Err(err) = self.check_held(&value) {
            tracing::warn!(error = %err, "default value rejected");
            return self;
        }
        self.apply_default(value)
    }

    /// Like [`with_default`](Self::with_default), but fails on a rejected default.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ReturnedKeyNotFound`] when a select-object
    /// default lacks the returned key.
    pub fn try_with_default(self, value: impl Into<Value>) -> FormResult<Self> {
        let value = value.into();
        self.check_held(&value)?;
        Ok(self.apply_default(value))
    }

    fn apply_default(mut self, value: Value) -> Self {
        let value = self.normalize(&Value::Null, value);
        self.default_value = value.clone();
        self.value = value;
        self.is_changed = false;
        self.refresh_initial_validity();
        self
    }

    /// Sets whether an optional string field submits `""` rather than null.
    #[must_use]
    pub fn have_empty_value(mut self, allowed: bool) -> Self {
        self.have_empty_value = allowed;
        self
    }

    // ── Value ────────────────────────────────────────────────────────

    /// Returns the value for display.
    ///
    /// Decimal fields present a clean integer string as a number; every
    /// other kind returns the stored value.
    pub fn value(&self) -> Value {
        if let (FieldKind::Decimal(_), Value::String(s)) = (&self.kind, &self.value) {
            if crate::presets::INTEGER_SHAPE.is_match(s) {
                if let Ok(n) = s.parse::<i64>() {
                    return Value::Int(n);
                }
            }
        }
        self.value.clone()
    }

    /// Returns the stored value without any presentation.
    pub const fn raw_value(&self) -> &Value {
        &self.value
    }

    /// Assigns a value, normalizing it and revalidating.
    ///
    /// Select-object fields are the exception to revalidation: an empty
    /// value is stored and the previous validity is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ReturnedKeyNotFound`] when a select-object field
    /// receives a value without its returned key.
    pub fn set_value(&mut self, value: impl Into<Value>) -> FormResult<()> {
        let value = value.into();
        if let FieldKind::SelectObject(config) = &self.kind {
            if value.is_empty() {
                self.store(value);
                return Ok(());
            }
            config.check(&value)?;
            self.store(value);
            self.validate();
            return Ok(());
        }
        let value = self.normalize(&self.value, value);
        self.store(value);
        self.validate();
        Ok(())
    }

    fn store(&mut self, value: Value) {
        if value != self.value {
            self.is_changed = true;
        }
        self.value = value;
    }

    /// Normalizes `incoming` as an edit of `current`.
    fn normalize(&self, current: &Value, incoming: Value) -> Value {
        match &self.kind {
            FieldKind::String(config) => config.normalize(current, incoming),
            FieldKind::DateTime(config) | FieldKind::Date(config) => config.normalize(incoming),
            _ => incoming,
        }
    }

    /// Rejects a non-empty select-object value lacking the returned key.
    fn check_held(&self, value: &Value) -> FormResult<()> {
        match &self.kind {
            FieldKind::SelectObject(config) if !value.is_empty() => config.check(value),
            _ => Ok(()),
        }
    }

    /// Returns the submission-ready value.
    pub fn value_clear(&self) -> Value {
        match &self.kind {
            FieldKind::Plain | FieldKind::Number(_) | FieldKind::Decimal(_) => self.value.clone(),
            FieldKind::String(config) => config.cleared(&self.value, self.have_empty_value),
            FieldKind::Select(_) => {
                if !self.is_required && (self.value_is_zero() || self.value_is_empty()) {
                    Value::Null
                } else {
                    self.value.clone()
                }
            }
            FieldKind::SelectObject(config) => {
                if self.value_is_empty() {
                    return Value::Null;
                }
                let Some(out) = self
                    .value
                    .as_object()
                    .and_then(|obj| obj.get(&config.returned_key))
                else {
                    tracing::warn!(key = %config.returned_key, "selected object lacks the returned key");
                    return Value::Null;
                };
                if out.is_empty() {
                    tracing::warn!(key = %config.returned_key, "selected object returns an empty value");
                }
                out.clone()
            }
            FieldKind::DateTime(config) => config
                .parse(&self.value, true)
                .map_or(Value::Null, |dt| {
                    Value::String(dt.format(ISO_DATETIME).to_string())
                }),
            FieldKind::Date(config) => config
                .parse(&self.value, false)
                .map_or(Value::Null, |dt| Value::String(dt.format(ISO_DATE).to_string())),
        }
    }

    /// Returns `true` when the value is null, `""`, or an empty object or list.
    pub fn value_is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns `true` when the value is a deliberate zero (`0` or `"0"`).
    pub fn value_is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Resets the value to the default and revalidates.
    ///
    /// The default goes through the same normalization as a fresh entry.
    pub fn clear(&mut self) {
        self.value = self.normalize(&Value::Null, self.default_value.clone());
        self.is_changed = false;
        self.validate();
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Runs the field's rules, updating validity and the validation message.
    pub fn validate(&mut self) -> Validity {
        let outcome = self.evaluate();
        match outcome {
            Outcome::Valid => self.mark_valid(),
            Outcome::ValidEmpty => {
                self.value = Value::String(String::new());
                self.mark_valid();
            }
            Outcome::Invalid(message) => {
                self.is_valid = Some(false);
                self.error.set_validation(message);
            }
        }
        tracing::debug!(
            kind = self.kind.name(),
            valid = ?self.is_valid,
            "field validated"
        );
        self.is_valid
    }

    fn mark_valid(&mut self) {
        self.is_valid = Some(true);
        self.error.clear_validation();
    }

    fn evaluate(&self) -> Outcome {
        if self.value_is_empty() && !self.value_is_zero() {
            if self.is_required {
                let message = if matches!(self.kind, FieldKind::Select(_)) {
                    CHOOSE_MESSAGE
                } else {
                    REQUIRED_MESSAGE
                };
                return Outcome::Invalid(message.to_string());
            }
            if self.kind.resets_empty_to_string() {
                return Outcome::ValidEmpty;
            }
            return Outcome::Valid;
        }

        let result = match &self.kind {
            FieldKind::Plain | FieldKind::SelectObject(_) => Ok(()),
            FieldKind::String(config) => config.check(&self.value),
            FieldKind::Number(config) => config.check(&self.value, false).map(|_| ()),
            FieldKind::Decimal(config) => config
                .number
                .check(&self.value, true)
                .and_then(|_| config.check_digits(&self.value)),
            FieldKind::Select(config) => self.check_selection(config),
            FieldKind::DateTime(config) => check_date(config, &self.value, true),
            FieldKind::Date(config) => check_date(config, &self.value, false),
        };
        match result {
            Ok(()) => Outcome::Valid,
            Err(message) => Outcome::Invalid(message),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn check_selection(&self, config: &SelectConfig) -> Result<(), String> {
        let below_min = self
            .value
            .as_number()
            .is_some_and(|n| n < config.min as f64);
        if below_min && self.is_required {
            return Err(CHOOSE_MESSAGE.to_string());
        }
        Ok(())
    }

    fn refresh_initial_validity(&mut self) {
        if self.value_is_empty() || self.value_is_zero() {
            self.is_valid = if self.is_required { None } else { Some(true) };
        } else {
            self.validate();
        }
    }

    /// The last computed validity.
    pub const fn is_valid(&self) -> Validity {
        self.is_valid
    }

    /// Overrides the validity without running any rule.
    pub fn set_is_valid(&mut self, validity: Validity) {
        self.is_valid = validity;
    }

    // ── Errors ───────────────────────────────────────────────────────

    /// The rendered error message (validation part, then external part).
    pub fn error(&self) -> String {
        self.error.render()
    }

    /// Both parts of the error message.
    pub const fn error_parts(&self) -> &FieldError {
        &self.error
    }

    /// Sets the external part of the error message; empty clears it.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error.set_external(message);
    }

    /// The error display class when the field is invalid, else `""`.
    pub fn error_class(&self) -> String {
        self.error_class_in(&SETTINGS.get())
    }

    /// Like [`error_class`](Self::error_class) with explicit settings.
    pub fn error_class_in(&self, settings: &Settings) -> String {
        if self.is_valid == Some(false) {
            settings.error_class.clone()
        } else {
            String::new()
        }
    }

    // ── Attributes ───────────────────────────────────────────────────

    /// Whether an answer is required.
    pub const fn is_required(&self) -> bool {
        self.is_required
    }

    /// Whether the value changed since construction or the last clear.
    pub const fn is_changed(&self) -> bool {
        self.is_changed
    }

    /// Whether an optional string field submits `""` rather than null.
    pub const fn allows_empty_value(&self) -> bool {
        self.have_empty_value
    }

    /// The value restored by [`clear`](Self::clear).
    pub const fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// The field kind and its configuration.
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The kind's short name, as used in logs.
    pub const fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// The input mask, or `""`.
    pub fn mask(&self) -> &str {
        match &self.kind {
            FieldKind::String(config) => &config.mask,
            FieldKind::DateTime(config) | FieldKind::Date(config) => &config.mask,
            _ => "",
        }
    }

    /// The example text, or `""`.
    pub fn example(&self) -> &str {
        match &self.kind {
            FieldKind::String(config) => &config.example,
            FieldKind::Number(config) => &config.example,
            FieldKind::Decimal(config) => &config.number.example,
            FieldKind::DateTime(config) | FieldKind::Date(config) => &config.example,
            _ => "",
        }
    }

    // ── Date accessors ───────────────────────────────────────────────

    fn located_date(&self) -> Option<(NaiveDateTime, &DateTimeConfig)> {
        let config = match &self.kind {
            FieldKind::DateTime(config) | FieldKind::Date(config) => config,
            _ => return None,
        };
        let found = match &self.value {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => config.date.find(s),
            _ => None,
        }?;
        Some((found, config))
    }

    /// Two-digit day of the stored date, or `""`.
    pub fn day(&self) -> String {
        self.located_date()
            .map(|(dt, _)| dt.format("%d").to_string())
            .unwrap_or_default()
    }

    /// Two-digit month of the stored date, or `""`.
    pub fn month(&self) -> String {
        self.located_date()
            .map(|(dt, _)| dt.format("%m").to_string())
            .unwrap_or_default()
    }

    /// Four-digit year of the stored date, or `""`.
    pub fn year(&self) -> String {
        self.located_date()
            .map(|(dt, _)| dt.format("%Y").to_string())
            .unwrap_or_default()
    }

    /// The date part in the date pattern, or `""`.
    pub fn date_part(&self) -> String {
        self.located_date()
            .map(|(dt, config)| config.date.format(&dt))
            .unwrap_or_default()
    }

    /// The time part in the time pattern, or `""`.
    pub fn time_part(&self) -> String {
        let config = match &self.kind {
            FieldKind::DateTime(config) => config,
            _ => return String::new(),
        };
        let found = match &self.value {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => config.time.find(s),
            _ => None,
        };
        found.map(|dt| config.time.format(&dt)).unwrap_or_default()
    }

    // ── Dynamic configuration ────────────────────────────────────────

    /// Applies named option overrides.
    ///
    /// Every name is checked against the options the field's kind accepts
    /// before anything is applied, so a failed call leaves the field unchanged.
    ///
    /// # Errors
    ///
    /// [`FormError::FieldNotFound`] for an unknown option name,
    /// [`FormError::InvalidOption`] for a value of the wrong type,
    /// [`FormError::InvalidPattern`] for a regex that does not compile, and
    /// [`FormError::ReturnedKeyNotFound`] when the held object or the default
    /// lacks the returned key.
    pub fn configure<I, K>(&mut self, options: I) -> FormResult<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let options: Vec<(String, Value)> =
            options.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let allowed = self.kind.options();
        let known = |name: &str| COMMON_OPTIONS.contains(&name) || allowed.contains(&name);
        if let Some((name, _)) = options.iter().find(|(name, _)| !known(name)) {
            return Err(FormError::FieldNotFound(name.clone()));
        }

        let mut next = self.clone();
        for (name, value) in options {
            next.apply_option(&name, value)?;
        }
        let default = std::mem::take(&mut next.default_value);
        next.default_value = next.normalize(&Value::Null, default);
        next.check_held(&next.default_value)?;
        next.check_held(&next.value)?;
        next.refresh_initial_validity();
        *self = next;
        Ok(())
    }

    fn apply_option(&mut self, name: &str, value: Value) -> FormResult<()> {
        match name {
            "default_value" => self.default_value = value,
            "is_required" => self.is_required = option_bool(name, &value)?,
            "have_empty_value" => self.have_empty_value = option_bool(name, &value)?,
            _ => match &mut self.kind {
                FieldKind::String(config) => match name {
                    "min_length" => config.min_length = option_usize(name, &value)?,
                    "max_length" => config.max_length = option_usize(name, &value)?,
                    "regex" => {
                        config.regex = match value {
                            Value::Null => None,
                            Value::String(p) => Some(
                                full_match(&p)
                                    .map_err(|e| FormError::InvalidPattern(e.to_string()))?,
                            ),
                            _ => return Err(invalid(name, "a pattern string or null")),
                        };
                    }
                    "example" => config.example = option_string(name, value)?,
                    "mask" => config.mask = option_string(name, value)?,
                    "return_with_mask" => config.return_with_mask = option_bool(name, &value)?,
                    _ => return Err(FormError::FieldNotFound(name.to_string())),
                },
                FieldKind::Number(config) => apply_number_option(config, name, value)?,
                FieldKind::Decimal(config) => match name {
                    "decimal_places" => config.decimal_places = option_u32(name, &value)?,
                    "max_digits" => config.max_digits = option_u32(name, &value)?,
                    _ => apply_number_option(&mut config.number, name, value)?,
                },
                FieldKind::Select(config) => match name {
                    "min" => {
                        config.min = value.as_int().ok_or_else(|| invalid(name, "an integer"))?;
                    }
                    _ => return Err(FormError::FieldNotFound(name.to_string())),
                },
                FieldKind::SelectObject(config) => match name {
                    "returned_key" => config.returned_key = option_string(name, value)?,
                    _ => return Err(FormError::FieldNotFound(name.to_string())),
                },
                FieldKind::DateTime(config) | FieldKind::Date(config) => match name {
                    "example" => config.example = option_string(name, value)?,
                    "mask" => config.mask = option_string(name, value)?,
                    _ => return Err(FormError::FieldNotFound(name.to_string())),
                },
                FieldKind::Plain => return Err(FormError::FieldNotFound(name.to_string())),
            },
        }
        Ok(())
    }
}

impl FieldContract for FormField {
    fn current_value(&self) -> Value {
        self.value()
    }

    fn set_raw_value(&mut self, value: Value) -> FormResult<()> {
        self.set_value(value)
    }

    fn cleared_value(&self) -> Value {
        self.value_clear()
    }

    fn revalidate(&mut self) -> Validity {
        self.validate()
    }

    fn validity(&self) -> Validity {
        self.is_valid
    }

    fn force_validity(&mut self, validity: Validity) {
        self.is_valid = validity;
    }

    fn required(&self) -> bool {
        self.is_required
    }

    fn set_external_error(&mut self, message: &str) {
        self.set_error(message);
    }
}

// ============================================================
// Helpers
// ============================================================

fn check_date(config: &DateTimeConfig, value: &Value, accept_iso: bool) -> Result<(), String> {
    if config.parse(value, accept_iso).is_some() {
        Ok(())
    } else {
        Err(format!("Enter a valid date. Example: {}", config.example))
    }
}

/// JavaScript-style falsiness: these values bypass masking.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Int(i) => *i == 0,
        Value::Float(f) => *f == 0.0 || f.is_nan(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Clamps complete hour and minute groups of `HHmm` digits.
fn clamp_time_digits(clean: &str) -> String {
    let chars: Vec<char> = clean.chars().collect();
    let mut out: Vec<char> = chars.clone();
    let clamp = |out: &mut Vec<char>, start: usize, max: u32| {
        if let Some(group) = chars.get(start..start + 2) {
            let text: String = group.iter().collect();
            if text.parse::<u32>().is_ok_and(|n| n > max) {
                out.splice(start..start + 2, format!("{max:02}").chars());
            }
        }
    };
    clamp(&mut out, 0, 23);
    clamp(&mut out, 2, 59);
    out.into_iter().collect()
}

fn example_hint(example: &str) -> String {
    with_example("Invalid format.", example)
}

fn with_example(message: &str, example: &str) -> String {
    if example.is_empty() {
        message.to_string()
    } else {
        format!("{message} Example: {example}")
    }
}

fn invalid(option: &str, expected: &'static str) -> FormError {
    FormError::InvalidOption {
        option: option.to_string(),
        expected,
    }
}

fn option_bool(name: &str, value: &Value) -> FormResult<bool> {
    value.as_bool().ok_or_else(|| invalid(name, "a boolean"))
}

fn option_usize(name: &str, value: &Value) -> FormResult<Option<usize>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => usize::try_from(*i)
            .map(Some)
            .map_err(|_| invalid(name, "a non-negative integer or null")),
        _ => Err(invalid(name, "a non-negative integer or null")),
    }
}

fn option_u32(name: &str, value: &Value) -> FormResult<u32> {
    value
        .as_int()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| invalid(name, "a non-negative integer"))
}

fn option_f64(name: &str, value: &Value) -> FormResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(_) | Value::Float(_) => Ok(value.as_number()),
        _ => Err(invalid(name, "a number or null")),
    }
}

fn option_string(name: &str, value: Value) -> FormResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(invalid(name, "a string")),
    }
}

fn apply_number_option(config: &mut NumberConfig, name: &str, value: Value) -> FormResult<()> {
    match name {
        "min" => config.min = option_f64(name, &value)?,
        "max" => config.max = option_f64(name, &value)?,
        "example" => config.example = option_string(name, value)?,
        _ => return Err(FormError::FieldNotFound(name.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    // ── Base contract ───────────────────────────────────────────────

    #[test]
    fn test_plain_required_empty_is_unevaluated() {
        let field = FormField::plain();
        assert_eq!(field.is_valid(), None);
        assert!(field.value_is_empty());
    }

    #[test]
    fn test_plain_optional_empty_is_valid() {
        let field = FormField::plain().required(false);
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_set_value_revalidates() {
        let mut field = FormField::plain();
        field.set_value("x").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("").unwrap();
        assert_eq!(field.is_valid(), Some(false));
        assert_eq!(field.error(), REQUIRED_MESSAGE);
    }

    #[test]
    fn test_zero_is_an_answer() {
        let mut field = FormField::plain();
        field.set_value(0).unwrap();
        assert!(field.value_is_zero());
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("0").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_empty_object_is_empty() {
        let mut field = FormField::plain();
        field
            .set_value(Value::Object(BTreeMap::new()))
            .unwrap();
        assert!(field.value_is_empty());
    }

    #[test]
    fn test_clear_restores_default() {
        let mut field = FormField::plain().with_default("start");
        field.set_value("changed").unwrap();
        assert!(field.is_changed());
        field.clear();
        assert_eq!(field.raw_value(), &Value::from("start"));
        assert!(!field.is_changed());
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_is_changed_tracks_assignment() {
        let mut field = FormField::plain().with_default("a");
        assert!(!field.is_changed());
        field.set_value("a").unwrap();
        assert!(!field.is_changed());
        field.set_value("b").unwrap();
        assert!(field.is_changed());
    }

    #[test]
    fn test_external_error_survives_revalidation() {
        let mut field = FormField::string(StringConfig::new().min_length(3));
        field.set_error("Taken");
        field.set_value("ab").unwrap();
        assert_eq!(field.error(), "Minimum length: 3 | Taken");
        field.set_value("abc").unwrap();
        assert_eq!(field.error(), "Taken");
    }

    #[test]
    fn test_error_class() {
        let mut field = FormField::plain();
        assert_eq!(field.error_class_in(&settings()), "");
        field.set_value("").unwrap();
        assert_eq!(field.error_class_in(&settings()), "b-danger");
    }

    // ── String ──────────────────────────────────────────────────────

    #[test]
    fn test_string_length_bounds() {
        let mut field = FormField::string(StringConfig::new().min_length(2).max_length(4));
        field.set_value("a").unwrap();
        assert_eq!(field.error(), "Minimum length: 2");
        field.set_value("abcde").unwrap();
        assert_eq!(field.error(), "Maximum length: 4");
        field.set_value("abc").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.error(), "");
    }

    #[test]
    fn test_string_regex_uses_example() {
        let config = StringConfig::new()
            .regex(full_match(r"[A-Z]{3}").unwrap())
            .example("ABC");
        let mut field = FormField::string(config);
        field.set_value("AB1").unwrap();
        assert_eq!(field.is_valid(), Some(false));
        assert_eq!(field.error(), "Invalid format. Example: ABC");
        field.set_value("XYZ").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_string_regex_is_full_match() {
        let mut field =
            FormField::string(StringConfig::new().regex(full_match(r"\d+").unwrap()));
        field.set_value("12a").unwrap();
        assert_eq!(field.is_valid(), Some(false));
    }

    #[test]
    fn test_string_optional_empty_resets_to_empty_string() {
        let mut field = FormField::string(StringConfig::new().min_length(3)).required(false);
        field.set_value(Value::Null).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.raw_value(), &Value::from(""));
        assert_eq!(field.value_clear(), Value::Null);
    }

    #[test]
    fn test_string_have_empty_value() {
        let mut field = FormField::string(StringConfig::new())
            .required(false)
            .have_empty_value(true);
        field.set_value("").unwrap();
        assert_eq!(field.value_clear(), Value::from(""));
    }

    #[test]
    fn test_masked_value_clear_without_mask() {
        let config = StringConfig::new().mask("___-___").min_length(6);
        let mut field = FormField::string(config);
        field.set_value("123456").unwrap();
        assert_eq!(field.raw_value(), &Value::from("123-456"));
        assert_eq!(field.value_clear(), Value::from("123456"));
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_masked_length_counts_stripped_characters() {
        let config = StringConfig::new().mask("___-___").min_length(6);
        let mut field = FormField::string(config);
        field.set_value("1234").unwrap();
        assert_eq!(field.raw_value(), &Value::from("123-4"));
        assert_eq!(field.error(), "Minimum length: 6");
    }

    #[test]
    fn test_masked_deletion_passes_through() {
        let mut field = FormField::string(StringConfig::new().mask("__.__.____"));
        field.set_value("26122000").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12.2000"));
        field.set_value("26.12.").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12."));
        field.set_value("26.12").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12"));
    }

    #[test]
    fn test_masked_literals_only_becomes_empty() {
        let mut field = FormField::string(StringConfig::new().mask("__.__")).required(false);
        field.set_value(".").unwrap();
        assert_eq!(field.raw_value(), &Value::from(""));
    }

    #[test]
    fn test_clamp_time_digits() {
        assert_eq!(clamp_time_digits("2561"), "2359");
        assert_eq!(clamp_time_digits("1275"), "1259");
        assert_eq!(clamp_time_digits("9"), "9");
        assert_eq!(clamp_time_digits("1230"), "1230");
    }

    // ── Number / Decimal ────────────────────────────────────────────

    #[test]
    fn test_number_accepts_numbers_and_integer_strings() {
        let mut field = FormField::number(NumberConfig::new());
        field.set_value(5).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("-12").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("1.5").unwrap();
        assert_eq!(field.is_valid(), Some(false));
        field.set_value(true).unwrap();
        assert_eq!(field.error(), NOT_A_NUMBER_MESSAGE);
    }

    #[test]
    fn test_number_checks_both_bounds() {
        let mut field = FormField::number(NumberConfig::new().min(1.0).max(10.0));
        field.set_value(0.5).unwrap();
        assert_eq!(field.error(), "Minimum: 1");
        field.set_value(11).unwrap();
        assert_eq!(field.is_valid(), Some(false));
        assert_eq!(field.error(), "Maximum: 10");
        field.set_value("7").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_number_zero_bound_is_enforced() {
        let mut field = FormField::number(NumberConfig::new().min(0.0));
        field.set_value(-1).unwrap();
        assert_eq!(field.error(), "Minimum: 0");
    }

    #[test]
    fn test_number_optional_empty_passes() {
        let mut field = FormField::number(NumberConfig::new().min(5.0)).required(false);
        field.set_value("").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_decimal_shape() {
        let mut field = FormField::decimal(DecimalConfig::new(6, 2));
        field.set_value("12.5").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("1.2.3").unwrap();
        assert_eq!(field.error(), "Only one decimal point is allowed.");
        field.set_value("1,5").unwrap();
        assert_eq!(field.is_valid(), Some(false));
    }

    #[test]
    fn test_decimal_digit_budgets() {
        let mut field = FormField::decimal(DecimalConfig::new(5, 2));
        field.set_value("1234").unwrap();
        assert_eq!(field.error(), "Maximum 3 digits before the decimal point.");
        field.set_value("1.234").unwrap();
        assert_eq!(field.error(), "Maximum 2 digits after the decimal point.");
        field.set_value("12.").unwrap();
        assert_eq!(
            field.error(),
            "Enter at least one digit after the decimal point."
        );
        field.set_value("123.45").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("0.45").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_decimal_digit_budget_on_float_values() {
        let mut field = FormField::decimal(DecimalConfig::new(4, 1));
        field.set_value(1.25).unwrap();
        assert_eq!(field.is_valid(), Some(false));
        field.set_value(123.5).unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_decimal_value_coerces_integer_strings() {
        let mut field = FormField::decimal(DecimalConfig::new(6, 2));
        field.set_value("42").unwrap();
        assert_eq!(field.value(), Value::Int(42));
        field.set_value("4.2").unwrap();
        assert_eq!(field.value(), Value::from("4.2"));
    }

    // ── Select ──────────────────────────────────────────────────────

    #[test]
    fn test_select_default_is_unevaluated() {
        let mut field = FormField::select();
        assert_eq!(field.is_valid(), None);
        field.validate();
        assert_eq!(field.is_valid(), Some(false));
        assert_eq!(field.error(), CHOOSE_MESSAGE);
    }

    #[test]
    fn test_select_min() {
        let mut field = FormField::select();
        field.set_value(3).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("").unwrap();
        assert_eq!(field.error(), CHOOSE_MESSAGE);
    }

    #[test]
    fn test_select_optional_clears_to_null() {
        let mut field = FormField::select().required(false);
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::Null);
        field.set_value(0).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::Null);
        field.set_value(2).unwrap();
        assert_eq!(field.value_clear(), Value::Int(2));
    }

    // ── Select object ───────────────────────────────────────────────

    fn city(id: i64) -> Value {
        let mut obj = BTreeMap::new();
        obj.insert("id".to_string(), Value::Int(id));
        obj.insert("name".to_string(), Value::from("Kazan"));
        Value::Object(obj)
    }

    #[test]
    fn test_select_object_returns_key() {
        let mut field = FormField::select_object("id");
        assert_eq!(field.value_clear(), Value::Null);
        field.set_value(city(16)).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::Int(16));
    }

    #[test]
    fn test_select_object_missing_key_is_error() {
        let mut field = FormField::select_object("code");
        let err = field.set_value(city(16)).unwrap_err();
        assert!(matches!(err, FormError::ReturnedKeyNotFound { .. }));
        assert!(field.value_is_empty());
    }

    #[test]
    fn test_select_object_empty_keeps_validity() {
        let mut field = FormField::select_object("id");
        field.set_value(city(1)).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        field.set_value(Value::Null).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.validate(), Some(false));
    }

    // ── Date / DateTime ─────────────────────────────────────────────

    #[test]
    fn test_date_from_display_and_iso() {
        let mut field = FormField::date_with(&settings());
        field.set_value("26.12.2000").unwrap();
        assert_eq!(field.value_clear(), Value::from("2000-12-26"));
        field.set_value("2000-12-26").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12.2000"));
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_date_in_progress_is_kept() {
        let mut field = FormField::date_with(&settings());
        field.set_value("26.12.2").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12.2"));
        assert_eq!(field.is_valid(), Some(false));
        assert_eq!(field.value_clear(), Value::Null);
        assert!(field.error().contains("26.12.2000"));
    }

    #[test]
    fn test_date_object_stored_as_is() {
        let mut field = FormField::date_with(&settings());
        let d = NaiveDate::from_ymd_opt(1999, 1, 5).unwrap();
        field.set_value(d).unwrap();
        assert_eq!(field.raw_value(), &Value::Date(d));
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::from("1999-01-05"));
        assert_eq!(field.day(), "05");
    }

    #[test]
    fn test_datetime_round_trip() {
        let mut field = FormField::datetime_with(&settings());
        field.set_value("2000-12-26T10:30:00").unwrap();
        assert_eq!(field.raw_value(), &Value::from("26.12.2000 10:30"));
        assert_eq!(field.value_clear(), Value::from("2000-12-26T10:30:00"));
        assert_eq!(field.date_part(), "26.12.2000");
        assert_eq!(field.time_part(), "10:30");
    }

    #[test]
    fn test_date_accessors() {
        let mut field = FormField::datetime_with(&settings());
        field.set_value("05.03.2021 08:15").unwrap();
        assert_eq!(field.day(), "05");
        assert_eq!(field.month(), "03");
        assert_eq!(field.year(), "2021");
        field.set_value("garbage").unwrap();
        assert_eq!(field.day(), "");
        assert_eq!(field.time_part(), "");
    }

    #[test]
    fn test_date_optional_empty() {
        let mut field = FormField::date_with(&settings()).required(false);
        field.set_value(Value::Null).unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::Null);
    }

    #[test]
    fn test_date_uses_injected_pattern() {
        let custom = Settings {
            format_date: "yyyy/MM/dd".to_string(),
            mask_date: "____/__/__".to_string(),
            ..Settings::default()
        };
        let mut field = FormField::date_with(&custom);
        assert_eq!(field.mask(), "____/__/__");
        field.set_value("2000-12-26").unwrap();
        assert_eq!(field.raw_value(), &Value::from("2000/12/26"));
    }

    // ── configure ───────────────────────────────────────────────────

    #[test]
    fn test_configure_applies_options() {
        let mut field = FormField::string(StringConfig::new());
        field
            .configure([
                ("min_length", Value::Int(2)),
                ("is_required", Value::Bool(false)),
                ("regex", Value::from("[a-z]+")),
            ])
            .unwrap();
        assert!(!field.is_required());
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("A").unwrap();
        assert_eq!(field.error(), "Minimum length: 2");
        field.set_value("AB").unwrap();
        assert_eq!(field.is_valid(), Some(false));
        field.set_value("ab").unwrap();
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_configure_unknown_option_changes_nothing() {
        let mut field = FormField::number(NumberConfig::new());
        let err = field
            .configure([("is_required", Value::Bool(false)), ("min_length", Value::Int(1))])
            .unwrap_err();
        assert!(matches!(err, FormError::FieldNotFound(ref name) if name == "min_length"));
        assert!(field.is_required());
    }

    #[test]
    fn test_configure_wrong_type() {
        let mut field = FormField::plain();
        let err = field
            .configure([("is_required", Value::from("yes"))])
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidOption { .. }));
    }

    #[test]
    fn test_configure_bad_regex() {
        let mut field = FormField::string(StringConfig::new());
        let err = field.configure([("regex", Value::from("("))]).unwrap_err();
        assert!(matches!(err, FormError::InvalidPattern(_)));
    }

    #[test]
    fn test_configure_returned_key_checked_against_value() {
        let mut field = FormField::select_object("id");
        field.set_value(city(3)).unwrap();
        let err = field
            .configure([("returned_key", Value::from("code"))])
            .unwrap_err();
        assert!(matches!(err, FormError::ReturnedKeyNotFound { .. }));
        field
            .configure([("returned_key", Value::from("name"))])
            .unwrap();
        assert_eq!(field.value_clear(), Value::from("Kazan"));
    }

    #[test]
    fn test_configured_default_is_normalized_on_clear() {
        let mut date = FormField::date_with(&settings());
        date.configure([("default_value", Value::from("2000-12-26"))])
            .unwrap();
        date.set_value("01.01.2001").unwrap();
        date.clear();
        assert_eq!(date.raw_value(), &Value::from("26.12.2000"));
        assert_eq!(date.is_valid(), Some(true));
        assert_eq!(date.value_clear(), Value::from("2000-12-26"));

        let mut phone = FormField::phone();
        phone
            .configure([("default_value", Value::from("79999999999"))])
            .unwrap();
        phone.set_value("+78888888888").unwrap();
        phone.clear();
        assert_eq!(phone.raw_value(), &Value::from("+79999999999"));
        assert_eq!(phone.is_valid(), Some(true));
        assert_eq!(phone.error(), "");
    }

    #[test]
    fn test_clear_clamps_time_default() {
        let mut time = FormField::time();
        time.configure([("default_value", Value::from("2575"))]).unwrap();
        time.clear();
        assert_eq!(time.raw_value(), &Value::from("23:59"));
        assert_eq!(time.is_valid(), Some(true));
    }

    #[test]
    fn test_with_default_normalizes_regardless_of_current_value() {
        let field = FormField::phone()
            .with_default("+78888888888")
            .with_default("79999999999");
        assert_eq!(field.raw_value(), &Value::from("+79999999999"));
    }

    #[test]
    fn test_select_object_default_without_key_is_rejected() {
        let mut kazan = BTreeMap::new();
        kazan.insert("name".to_string(), Value::from("Kazan"));
        let kazan = Value::Object(kazan);

        let field = FormField::select_object("id").with_default(kazan.clone());
        assert!(field.value_is_empty());
        assert_eq!(field.is_valid(), None);
        assert_eq!(field.value_clear(), Value::Null);

        let err = FormField::select_object("id")
            .try_with_default(kazan.clone())
            .unwrap_err();
        assert!(matches!(err, FormError::ReturnedKeyNotFound { ref key } if key == "id"));

        let field = FormField::select_object("id")
            .try_with_default(city(4))
            .unwrap();
        assert_eq!(field.value_clear(), Value::Int(4));

        let mut field = FormField::select_object("id");
        let err = field.configure([("default_value", kazan)]).unwrap_err();
        assert!(matches!(err, FormError::ReturnedKeyNotFound { .. }));
        assert!(field.default_value().is_empty());
    }

    #[test]
    fn test_returned_key_change_checks_default() {
        let mut field = FormField::select_object("id").with_default(city(2));
        let err = field
            .configure([("returned_key", Value::from("code"))])
            .unwrap_err();
        assert!(matches!(err, FormError::ReturnedKeyNotFound { .. }));
        field.clear();
        assert_eq!(field.value_clear(), Value::Int(2));
    }

    #[test]
    fn test_configure_decimal_budget() {
        let mut field = FormField::decimal(DecimalConfig::new(10, 2)).with_default("123.45");
        assert_eq!(field.is_valid(), Some(true));
        field
            .configure([("max_digits", Value::Int(4))])
            .unwrap();
        assert_eq!(field.is_valid(), Some(false));
    }

    #[test]
    fn test_contract_delegates() {
        let mut field = FormField::plain();
        let contract: &mut dyn FieldContract = &mut field;
        contract.set_raw_value(Value::from("x")).unwrap();
        assert_eq!(contract.validity(), Some(true));
        contract.force_validity(Some(false));
        assert_eq!(contract.revalidate(), Some(true));
        assert!(contract.required());
        contract.set_external_error("bad");
        assert_eq!(field.error(), "bad");
    }
}
