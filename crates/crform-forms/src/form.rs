//! Forms: named fields validated as a unit.
//!
//! A [`Form`] keeps two ordered collections. Typed members are backed by a
//! [`FormField`] or a [`ListField`] and take part in validation; plain members
//! hold an arbitrary [`Value`] that is passed through untouched. A name's
//! class is chosen when it is first registered and never changes.
//!
//! ```
//! use crform_core::Value;
//! use crform_forms::fields::FormField;
//! use crform_forms::form::Form;
//!
//! let mut form = Form::new()
//!     .with_field("email", FormField::email())
//!     .with_value("source", "landing");
//!
//! form.set_fields([("email", Value::from("user@example.com"))]).unwrap();
//! assert!(form.check_valid());
//! assert_eq!(form.value_fields()["email"], Value::from("user@example.com"));
//! ```

use std::collections::BTreeMap;

use crform_core::logging::form_span;
use crform_core::{FormResult, Value};

use crate::contract::{FieldContract, Validity};
use crate::fields::FormField;
use crate::list_field::ListField;

/// A typed form member.
#[derive(Debug, Clone)]
pub enum TypedField {
    /// A single field.
    Field(FormField),
    /// A list of sub-forms.
    List(ListField),
}

impl TypedField {
    /// Returns the field, if this member is a single field.
    pub const fn as_field(&self) -> Option<&FormField> {
        match self {
            Self::Field(field) => Some(field),
            Self::List(_) => None,
        }
    }

    /// Returns the list, if this member is a list field.
    pub const fn as_list(&self) -> Option<&ListField> {
        match self {
            Self::List(list) => Some(list),
            Self::Field(_) => None,
        }
    }

    /// The rendered error message of the member.
    pub fn error(&self) -> String {
        match self {
            Self::Field(field) => field.error(),
            Self::List(list) => list.error(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Field(field) => field.clear(),
            Self::List(list) => list.clear(),
        }
    }
}

impl FieldContract for TypedField {
    fn current_value(&self) -> Value {
        match self {
            Self::Field(field) => field.current_value(),
            Self::List(list) => list.current_value(),
        }
    }

    fn set_raw_value(&mut self, value: Value) -> FormResult<()> {
        match self {
            Self::Field(field) => field.set_raw_value(value),
            Self::List(list) => list.set_raw_value(value),
        }
    }

    fn cleared_value(&self) -> Value {
        match self {
            Self::Field(field) => field.cleared_value(),
            Self::List(list) => list.cleared_value(),
        }
    }

    fn revalidate(&mut self) -> Validity {
        match self {
            Self::Field(field) => field.revalidate(),
            Self::List(list) => list.revalidate(),
        }
    }

    fn validity(&self) -> Validity {
        match self {
            Self::Field(field) => field.validity(),
            Self::List(list) => list.validity(),
        }
    }

    fn force_validity(&mut self, validity: Validity) {
        match self {
            Self::Field(field) => field.force_validity(validity),
            Self::List(list) => list.force_validity(validity),
        }
    }

    fn required(&self) -> bool {
        match self {
            Self::Field(field) => field.required(),
            Self::List(list) => list.required(),
        }
    }

    fn set_external_error(&mut self, message: &str) {
        match self {
            Self::Field(field) => field.set_external_error(message),
            Self::List(list) => list.set_external_error(message),
        }
    }
}

/// One member handed to [`Form::from_entries`].
#[derive(Debug, Clone)]
pub enum FormEntry {
    /// Registers a typed single field.
    Field(FormField),
    /// Registers a typed list field.
    List(ListField),
    /// Registers a plain value.
    Value(Value),
}

impl From<FormField> for FormEntry {
    fn from(field: FormField) -> Self {
        Self::Field(field)
    }
}

impl From<ListField> for FormEntry {
    fn from(list: ListField) -> Self {
        Self::List(list)
    }
}

impl From<Value> for FormEntry {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A set of named fields validated and submitted together.
#[derive(Debug, Clone, Default)]
pub struct Form {
    typed: Vec<(String, TypedField)>,
    plain: Vec<(String, Value)>,
    errors: BTreeMap<String, String>,
}

impl Form {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form from `(name, entry)` pairs, in order.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FormEntry)>,
        K: Into<String>,
    {
        let mut form = Self::new();
        for (name, entry) in entries {
            form.insert(name, entry);
        }
        form
    }

    /// Adds a typed single field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FormField) -> Self {
        self.insert(name, FormEntry::Field(field));
        self
    }

    /// Adds a typed list field.
    #[must_use]
    pub fn with_list(mut self, name: impl Into<String>, list: ListField) -> Self {
        self.insert(name, FormEntry::List(list));
        self
    }

    /// Adds a plain value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, FormEntry::Value(value.into()));
        self
    }

    /// Registers a member under `name`.
    ///
    /// Returns `false` and leaves the form unchanged when the name is already
    /// registered.
    pub fn insert(&mut self, name: impl Into<String>, entry: FormEntry) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        match entry {
            FormEntry::Field(field) => self.typed.push((name, TypedField::Field(field))),
            FormEntry::List(list) => self.typed.push((name, TypedField::List(list))),
            FormEntry::Value(value) => self.plain.push((name, value)),
        }
        true
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Returns `true` if `name` is registered in either class.
    pub fn contains(&self, name: &str) -> bool {
        self.typed_index(name).is_some() || self.plain_index(name).is_some()
    }

    fn typed_index(&self, name: &str) -> Option<usize> {
        self.typed.iter().position(|(n, _)| n == name)
    }

    fn plain_index(&self, name: &str) -> Option<usize> {
        self.plain.iter().position(|(n, _)| n == name)
    }

    /// Returns the typed member named `name`.
    pub fn typed(&self, name: &str) -> Option<&TypedField> {
        self.typed.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    /// Returns the single field named `name`.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.typed(name).and_then(TypedField::as_field)
    }

    /// Returns the single field named `name` mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.typed.iter_mut().find_map(|(n, f)| match f {
            TypedField::Field(field) if n.as_str() == name => Some(field),
            _ => None,
        })
    }

    /// Returns the list field named `name`.
    pub fn list(&self, name: &str) -> Option<&ListField> {
        self.typed(name).and_then(TypedField::as_list)
    }

    /// Returns the list field named `name` mutably.
    pub fn list_mut(&mut self, name: &str) -> Option<&mut ListField> {
        self.typed.iter_mut().find_map(|(n, f)| match f {
            TypedField::List(list) if n.as_str() == name => Some(list),
            _ => None,
        })
    }

    /// Returns the plain value named `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.plain.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Typed member names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.typed.iter().map(|(n, _)| n.as_str())
    }

    /// Plain member names in registration order.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.plain.iter().map(|(n, _)| n.as_str())
    }

    /// Typed members in registration order.
    pub fn typed_fields(&self) -> impl Iterator<Item = (&str, &TypedField)> {
        self.typed.iter().map(|(n, f)| (n.as_str(), f))
    }

    /// Total number of members.
    pub fn len(&self) -> usize {
        self.typed.len() + self.plain.len()
    }

    /// Returns `true` when the form has no members.
    pub fn is_empty(&self) -> bool {
        self.typed.is_empty() && self.plain.is_empty()
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Every typed member's cleared value plus every plain member's value.
    ///
    /// The map is keyed by name, so iteration is sorted by name. Use
    /// [`value_entries`](Self::value_entries) for registration order.
    pub fn value_fields(&self) -> BTreeMap<String, Value> {
        self.value_entries().into_iter().collect()
    }

    /// Like [`value_fields`](Self::value_fields), in registration order:
    /// typed members first, then plain members.
    pub fn value_entries(&self) -> Vec<(String, Value)> {
        self.typed
            .iter()
            .map(|(n, f)| (n.clone(), f.cleared_value()))
            .chain(self.plain.iter().map(|(n, v)| (n.clone(), v.clone())))
            .collect()
    }

    /// The typed members' cleared values in registration order.
    pub fn value_list(&self) -> Vec<Value> {
        self.typed.iter().map(|(_, f)| f.cleared_value()).collect()
    }

    // ── Bulk assignment ──────────────────────────────────────────────

    /// Assigns values by name, registering unknown names as plain members.
    ///
    /// A typed member is set through its own setter and then marked valid:
    /// bulk-assigned values are trusted as they come.
    ///
    /// # Errors
    ///
    /// Propagates the first error from a typed member's setter. Members
    /// earlier in `values` keep their new values.
    pub fn set_fields<I, K>(&mut self, values: I) -> FormResult<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.assign(values, true)
    }

    /// Like [`set_fields`](Self::set_fields), but ignores unknown names.
    ///
    /// # Errors
    ///
    /// Propagates the first error from a typed member's setter.
    pub fn set_existing_fields<I, K>(&mut self, values: I) -> FormResult<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.assign(values, false)
    }

    fn assign<I, K>(&mut self, values: I, register_unknown: bool) -> FormResult<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (name, value) in values {
            let name = name.into();
            if let Some(i) = self.typed_index(&name) {
                let field = &mut self.typed[i].1;
                field.set_raw_value(value)?;
                field.force_validity(Some(true));
            } else if let Some(i) = self.plain_index(&name) {
                self.plain[i].1 = value;
            } else if register_unknown {
                tracing::trace!(field = %name, "registered plain field");
                self.plain.push((name, value));
            }
        }
        Ok(())
    }

    // ── Errors ───────────────────────────────────────────────────────

    /// Distributes externally supplied errors.
    ///
    /// A dotted key (`person.email`) is matched by the part after its first
    /// dot. Errors naming a typed member go into that member's external error
    /// slot; the rest are kept on the form under their original key.
    pub fn set_errors<I, K, M>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        for (key, message) in errors {
            let key = key.into();
            let message = message.into();
            let candidate = key.split_once('.').map_or(key.as_str(), |(_, rest)| rest);
            if let Some(i) = self.typed_index(candidate) {
                self.typed[i].1.set_external_error(&message);
            } else {
                self.errors.insert(key, message);
            }
        }
    }

    /// Errors that matched no typed member.
    pub const fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Revalidates every typed member and returns whether the form is valid.
    ///
    /// No member is skipped, so every member shows current validity
    /// afterwards. A required member that stays unevaluated is marked
    /// invalid.
    pub fn check_valid(&mut self) -> bool {
        let span = form_span(self.typed.len());
        let _guard = span.enter();

        let mut valid = true;
        for (name, field) in &mut self.typed {
            match field.revalidate() {
                Some(true) => {}
                Some(false) => {
                    tracing::debug!(field = %name, "field invalid");
                    valid = false;
                }
                None => {
                    if field.required() {
                        tracing::debug!(field = %name, "required field left empty");
                        field.force_validity(Some(false));
                        valid = false;
                    }
                }
            }
        }
        valid
    }

    /// Resets every typed member to its default.
    pub fn clear(&mut self) {
        for (_, field) in &mut self.typed {
            field.clear();
        }
    }
}
