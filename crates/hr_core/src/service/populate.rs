//! Read-time expansion of employee department references.
//!
//! # Responsibility
//! - Resolve a `DepartmentRef` into a full `Department` through an injected
//!   lookup.
//! - Project employees into `EmployeeView` with the reference either kept
//!   raw or replaced by the resolved record.
//!
//! # Invariants
//! - Expansion never writes to storage.
//! - An unresolved reference, or one rejected by the sub-filter, becomes
//!   `null`; it never drops the employee and never raises an error.

use crate::model::department::Department;
use crate::model::employee::{DepartmentRef, Employee, EmployeeId};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::RepoResult;
use serde::Serialize;

/// Capability to resolve a department reference.
pub trait DepartmentLookup {
    fn resolve_department(&self, reference: &DepartmentRef) -> RepoResult<Option<Department>>;
}

impl DepartmentLookup for SqliteDepartmentRepository<'_> {
    fn resolve_department(&self, reference: &DepartmentRef) -> RepoResult<Option<Department>> {
        match reference {
            DepartmentRef::Id(id) => self.get_department(*id),
            DepartmentRef::Name(name) => self.find_department_by_name(name),
        }
    }
}

/// Predicate applied to a resolved department before it is attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentMatch {
    pub name: Option<String>,
}

impl DepartmentMatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn matches(&self, department: &Department) -> bool {
        self.name
            .as_deref()
            .map_or(true, |name| department.name == name)
    }
}

/// Whether and how reads expand the department reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Populate {
    /// Keep the raw reference.
    #[default]
    None,
    /// Replace the reference with the matching department, if any.
    Department(DepartmentMatch),
}

impl Populate {
    /// Expand without a sub-filter.
    pub fn department() -> Self {
        Self::Department(DepartmentMatch::default())
    }

    /// Expand, attaching only departments accepted by `matcher`.
    pub fn department_matching(matcher: DepartmentMatch) -> Self {
        Self::Department(matcher)
    }
}

/// Department field as seen by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DepartmentField {
    Reference(DepartmentRef),
    /// `None` serializes as `null`.
    Populated(Option<Department>),
}

impl DepartmentField {
    /// Resolved department, when expanded and matched.
    pub fn populated(&self) -> Option<&Department> {
        match self {
            Self::Populated(department) => department.as_ref(),
            Self::Reference(_) => None,
        }
    }

    pub fn reference(&self) -> Option<&DepartmentRef> {
        match self {
            Self::Reference(reference) => Some(reference),
            Self::Populated(_) => None,
        }
    }
}

/// Read projection of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub department: DepartmentField,
}

/// Projects one employee, resolving its department when requested.
pub fn project_employee<L: DepartmentLookup + ?Sized>(
    lookup: &L,
    employee: Employee,
    populate: &Populate,
) -> RepoResult<EmployeeView> {
    let department = match populate {
        Populate::None => DepartmentField::Reference(employee.department),
        Populate::Department(matcher) => DepartmentField::Populated(
            lookup
                .resolve_department(&employee.department)?
                .filter(|department| matcher.matches(department)),
        ),
    };

    Ok(EmployeeView {
        id: employee.id,
        first_name: employee.first_name,
        last_name: employee.last_name,
        department,
    })
}
