//! Core records logic for the HR service.
//! This crate owns validation and relationship rules for departments and
//! employees; routing layers call into its services.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{
    validate_department, Department, DepartmentId, DepartmentPatch, NewDepartment,
};
pub use model::employee::{
    validate_employee, DepartmentRef, Employee, EmployeeId, EmployeePatch, NewEmployee,
};
pub use model::validate::{FieldErrorKind, FieldRule, ValidationError};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeFilter, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{RepoError, RepoResult};
pub use service::department_service::{pick_random, DepartmentService};
pub use service::employee_service::EmployeeService;
pub use service::populate::{
    DepartmentField, DepartmentLookup, DepartmentMatch, EmployeeView, Populate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
