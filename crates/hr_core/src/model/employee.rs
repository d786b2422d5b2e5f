//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted `Employee` record and its create/patch inputs.
//! - Model the `department` field as an explicit weak reference.
//!
//! # Invariants
//! - `firstName`, `lastName` and `department` are always present strings.
//! - A `DepartmentRef` never guarantees that the department exists.

use crate::model::department::{Department, DepartmentId};
use crate::model::validate::{
    check_text, DocumentValidator, FieldErrorKind, FieldRule, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable employee identifier.
pub type EmployeeId = Uuid;

const REQUIRED_STRING: &[FieldRule] = &[FieldRule::Required, FieldRule::IsString];
const OPTIONAL_STRING: &[FieldRule] = &[FieldRule::IsString];

/// Weak reference from an employee to a department.
///
/// Serialized as a plain string: the id in hyphenated form, or the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DepartmentRef {
    Id(DepartmentId),
    Name(String),
}

impl DepartmentRef {
    /// Interprets raw input: a lowercase hyphenated UUID is an id, anything
    /// else (other UUID spellings included) a name kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) if id.hyphenated().to_string() == raw => Self::Id(id),
            _ => Self::Name(raw.to_string()),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Stored discriminator: `id` or `name`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
        }
    }

    /// Stored value without the discriminator.
    pub fn value(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

impl Display for DepartmentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for DepartmentRef {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for DepartmentRef {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<DepartmentRef> for String {
    fn from(value: DepartmentRef) -> Self {
        value.to_string()
    }
}

impl From<&Department> for DepartmentRef {
    fn from(value: &Department) -> Self {
        Self::Id(value.id)
    }
}

/// Persisted employee record. `department` is kept unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub department: DepartmentRef,
}

/// Validated input for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub department: DepartmentRef,
}

/// Partial update for an employee. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentRef>,
}

/// Validates a raw employee candidate document.
pub fn validate_employee(candidate: &Value) -> Result<(), ValidationError> {
    NewEmployee::from_document(candidate).map(drop)
}

impl NewEmployee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<DepartmentRef>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
        }
    }

    /// Extracts an employee input from a raw document.
    ///
    /// All three fields are checked independently, so one call reports every
    /// missing or mistyped field.
    pub fn from_document(candidate: &Value) -> Result<Self, ValidationError> {
        let mut validator = DocumentValidator::new(candidate);
        let first_name = validator.string("firstName", REQUIRED_STRING);
        let last_name = validator.string("lastName", REQUIRED_STRING);
        let department = validator.string("department", REQUIRED_STRING);
        validator.finish()?;

        match (first_name, last_name, department) {
            (Some(first_name), Some(last_name), Some(department)) => Ok(Self {
                first_name,
                last_name,
                department: DepartmentRef::parse(&department),
            }),
            _ => Err(ValidationError::single("firstName", FieldErrorKind::Required)),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.first_name, &self.last_name, &self.department)
    }
}

impl Employee {
    /// Builds an employee with a fresh generated id.
    pub fn create(input: NewEmployee) -> Result<Self, ValidationError> {
        input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: input.first_name,
            last_name: input.last_name,
            department: input.department,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.first_name, &self.last_name, &self.department)
    }

    /// Returns a new snapshot with `patch` merged in. Does not validate.
    pub fn apply(&self, patch: &EmployeePatch) -> Self {
        Self {
            id: self.id,
            first_name: patch
                .first_name
                .clone()
                .unwrap_or_else(|| self.first_name.clone()),
            last_name: patch
                .last_name
                .clone()
                .unwrap_or_else(|| self.last_name.clone()),
            department: patch
                .department
                .clone()
                .unwrap_or_else(|| self.department.clone()),
        }
    }
}

impl EmployeePatch {
    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<DepartmentRef>) -> Self {
        self.department = Some(value.into());
        self
    }

    /// Extracts a `$set`-style patch from a raw document. Present fields must
    /// be strings; unknown keys are ignored.
    pub fn from_document(patch: &Value) -> Result<Self, ValidationError> {
        let mut validator = DocumentValidator::new(patch);
        let first_name = validator.string("firstName", OPTIONAL_STRING);
        let last_name = validator.string("lastName", OPTIONAL_STRING);
        let department = validator.string("department", OPTIONAL_STRING);
        validator.finish()?;

        Ok(Self {
            first_name,
            last_name,
            department: department.as_deref().map(DepartmentRef::parse),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.department.is_none()
    }
}

fn validate_fields(
    first_name: &str,
    last_name: &str,
    department: &DepartmentRef,
) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    check_text(&mut errors, "firstName", first_name, REQUIRED_STRING);
    check_text(&mut errors, "lastName", last_name, REQUIRED_STRING);
    if let DepartmentRef::Name(name) = department {
        check_text(&mut errors, "department", name, REQUIRED_STRING);
    }
    errors.into_result()
}
