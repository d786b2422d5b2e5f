//! Field validators shared by entity models.
//!
//! # Responsibility
//! - Provide reusable field rules (`required`, `is_string`, `length_between`).
//! - Collect every failing field into one field-keyed `ValidationError`.
//!
//! # Invariants
//! - Validators are pure and never panic.
//! - One reason is reported per field: the first failing rule in order.
//! - Failures on distinct fields are all reported, never only the first.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason one field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Value is absent, null or an empty string.
    Required,
    /// Value is present but not a JSON string.
    NotString { found: &'static str },
    /// String character count is outside `[min, max]`.
    Length {
        min: usize,
        max: usize,
        actual: usize,
    },
}

impl Display for FieldErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::NotString { found } => write!(f, "must be a string, got {found}"),
            Self::Length { min, max, actual } => write!(
                f,
                "must be between {min} and {max} characters long, got {actual}"
            ),
        }
    }
}

/// Field-keyed report of every failed constraint for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    fields: BTreeMap<&'static str, FieldErrorKind>,
}

impl ValidationError {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a report with a single failing field.
    pub fn single(field: &'static str, kind: FieldErrorKind) -> Self {
        let mut error = Self::new();
        error.insert(field, kind);
        error
    }

    /// Records a failure for `field`. The first reason recorded wins.
    pub fn insert(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.fields.entry(field).or_insert(kind);
    }

    /// Returns the failure reason for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldErrorKind> {
        self.fields.get(field)
    }

    /// Returns whether `field` failed validation.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates failed fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldErrorKind)> + '_ {
        self.fields.iter().map(|(field, kind)| (*field, kind))
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field has failed so far.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Human-readable messages keyed by field name.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.fields
            .iter()
            .map(|(field, kind)| (*field, format!("`{field}` {kind}")))
            .collect()
    }

    /// Converts an empty report into `Ok(())`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        let mut separator = ": ";
        for (field, kind) in &self.fields {
            write!(f, "{separator}`{field}` {kind}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Declarative rule applied to one raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    IsString,
    /// Inclusive character-count bounds.
    LengthBetween { min: usize, max: usize },
}

impl FieldRule {
    /// Runs this rule against a raw value.
    pub fn check(self, value: Option<&Value>) -> Result<(), FieldErrorKind> {
        match self {
            Self::Required => required(value),
            Self::IsString => is_string(value),
            Self::LengthBetween { min, max } => match value {
                Some(Value::String(text)) => length_between(text, min, max),
                _ => Ok(()),
            },
        }
    }
}

/// Fails when `value` is absent, null or an empty string.
pub fn required(value: Option<&Value>) -> Result<(), FieldErrorKind> {
    match value {
        None | Some(Value::Null) => Err(FieldErrorKind::Required),
        Some(Value::String(text)) if text.is_empty() => Err(FieldErrorKind::Required),
        Some(_) => Ok(()),
    }
}

/// Fails when a present value is not a string.
///
/// Absent or null values pass; pair with `required` to reject them.
pub fn is_string(value: Option<&Value>) -> Result<(), FieldErrorKind> {
    match value {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(other) => Err(FieldErrorKind::NotString {
            found: json_type_name(other),
        }),
    }
}

/// Fails when the character count of `text` is outside `[min, max]`.
pub fn length_between(text: &str, min: usize, max: usize) -> Result<(), FieldErrorKind> {
    let actual = text.chars().count();
    if actual < min || actual > max {
        return Err(FieldErrorKind::Length { min, max, actual });
    }
    Ok(())
}

/// Applies `rules` in order and returns the first failure.
pub fn check_field(value: Option<&Value>, rules: &[FieldRule]) -> Result<(), FieldErrorKind> {
    rules.iter().try_for_each(|rule| rule.check(value))
}

/// Accumulates field failures while extracting typed values from a raw
/// document.
pub(crate) struct DocumentValidator<'doc> {
    fields: Option<&'doc Map<String, Value>>,
    errors: ValidationError,
}

impl<'doc> DocumentValidator<'doc> {
    /// Non-object documents are treated as having no fields.
    pub(crate) fn new(document: &'doc Value) -> Self {
        Self {
            fields: document.as_object(),
            errors: ValidationError::new(),
        }
    }

    /// Validates one field and returns its string value when it passed.
    pub(crate) fn string(&mut self, field: &'static str, rules: &[FieldRule]) -> Option<String> {
        let value = self.fields.and_then(|fields| fields.get(field));
        match check_field(value, rules) {
            Ok(()) => value.and_then(Value::as_str).map(str::to_string),
            Err(kind) => {
                self.errors.insert(field, kind);
                None
            }
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        self.errors.into_result()
    }
}

/// Validates an already-typed string value against `rules`.
pub(crate) fn check_text(
    errors: &mut ValidationError,
    field: &'static str,
    text: &str,
    rules: &[FieldRule],
) {
    let value = Value::from(text);
    if let Err(kind) = check_field(Some(&value), rules) {
        errors.insert(field, kind);
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
