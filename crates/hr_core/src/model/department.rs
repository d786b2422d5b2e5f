//! Department domain model.
//!
//! # Responsibility
//! - Define the persisted `Department` record and its create/patch inputs.
//! - Validate raw candidate documents and typed snapshots.
//!
//! # Invariants
//! - `id` is system-generated and never changes.
//! - `name` is present, string-typed and 5..=20 characters long.

use crate::model::validate::{
    check_text, DocumentValidator, FieldErrorKind, FieldRule, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable department identifier.
pub type DepartmentId = Uuid;

/// Minimum accepted department name length, in characters.
pub const DEPARTMENT_NAME_MIN_LEN: usize = 5;
/// Maximum accepted department name length, in characters.
pub const DEPARTMENT_NAME_MAX_LEN: usize = 20;

const NAME_RULES: &[FieldRule] = &[
    FieldRule::Required,
    FieldRule::IsString,
    FieldRule::LengthBetween {
        min: DEPARTMENT_NAME_MIN_LEN,
        max: DEPARTMENT_NAME_MAX_LEN,
    },
];

/// Persisted department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Validated input for creating a department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
}

/// Partial update for a department. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    pub name: Option<String>,
}

/// Validates a raw department candidate document.
pub fn validate_department(candidate: &Value) -> Result<(), ValidationError> {
    NewDepartment::from_document(candidate).map(drop)
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Extracts a department input from a raw document, reporting every
    /// failing field.
    pub fn from_document(candidate: &Value) -> Result<Self, ValidationError> {
        let mut validator = DocumentValidator::new(candidate);
        let name = validator.string("name", NAME_RULES);
        validator.finish()?;

        match name {
            Some(name) => Ok(Self { name }),
            None => Err(ValidationError::single("name", FieldErrorKind::Required)),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

impl Department {
    /// Builds a department with a fresh generated id.
    pub fn create(input: NewDepartment) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }

    /// Returns a new snapshot with `patch` merged in. Does not validate.
    pub fn apply(&self, patch: &DepartmentPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
        }
    }
}

impl DepartmentPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Extracts a patch from a raw document. Present fields must be strings;
    /// unknown keys are ignored.
    pub fn from_document(patch: &Value) -> Result<Self, ValidationError> {
        let mut validator = DocumentValidator::new(patch);
        let name = validator.string("name", &[FieldRule::IsString]);
        validator.finish()?;
        Ok(Self { name })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    check_text(&mut errors, "name", name, NAME_RULES);
    errors.into_result()
}
