//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the employee CRUD contract consumed by routing layers.
//! - Apply department expansion on reads through an injected lookup.
//! - Implement partial-merge single and bulk updates.
//!
//! # Invariants
//! - Every merged snapshot is validated before it is written.
//! - Bulk updates validate all matched snapshots before writing any.
//! - Department sub-filters never remove employees from a result.

use crate::model::employee::{Employee, EmployeeId, EmployeePatch, NewEmployee};
use crate::repo::employee_repo::{EmployeeFilter, EmployeeRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::populate::{project_employee, DepartmentLookup, EmployeeView, Populate};
use log::{info, warn};
use serde_json::Value;

/// Use-case service for employees with department expansion.
pub struct EmployeeService<E: EmployeeRepository, D: DepartmentLookup> {
    employees: E,
    departments: D,
}

impl<E: EmployeeRepository, D: DepartmentLookup> EmployeeService<E, D> {
    /// Creates a service from an employee repository and a department lookup.
    pub fn new(employees: E, departments: D) -> Self {
        Self {
            employees,
            departments,
        }
    }

    /// Validates, assigns a fresh id and persists an employee.
    ///
    /// The department reference is not checked for existence.
    pub fn create(&self, input: NewEmployee) -> RepoResult<Employee> {
        let employee = Employee::create(input).map_err(|err| {
            warn!(
                "event=employee_create module=service status=rejected fields={}",
                err.len()
            );
            RepoError::from(err)
        })?;
        self.employees.create_employee(&employee)?;
        info!(
            "event=employee_create module=service status=ok id={}",
            employee.id
        );
        Ok(employee)
    }

    /// Validates a raw request body and creates the employee.
    pub fn create_from_document(&self, candidate: &Value) -> RepoResult<Employee> {
        self.create(NewEmployee::from_document(candidate)?)
    }

    /// Loads one stored employee with its raw department reference.
    pub fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.employees.get_employee(id)
    }

    /// Lists employees matching `filter`, optionally expanding departments.
    pub fn find_all(
        &self,
        filter: &EmployeeFilter,
        populate: &Populate,
    ) -> RepoResult<Vec<EmployeeView>> {
        self.employees
            .list_employees(filter)?
            .into_iter()
            .map(|employee| project_employee(&self.departments, employee, populate))
            .collect()
    }

    /// Returns the first employee matching `filter`.
    ///
    /// A department sub-filter in `populate` only decides whether the
    /// department is attached; it never turns a match into `None`.
    pub fn find_one(
        &self,
        filter: &EmployeeFilter,
        populate: &Populate,
    ) -> RepoResult<Option<EmployeeView>> {
        self.employees
            .find_employee(filter)?
            .map(|employee| project_employee(&self.departments, employee, populate))
            .transpose()
    }

    /// Merges `patch` into the first matching employee. Returns 0 or 1.
    pub fn update_one(&self, filter: &EmployeeFilter, patch: &EmployeePatch) -> RepoResult<usize> {
        let Some(current) = self.employees.find_employee(filter)? else {
            return Ok(0);
        };
        let updated = current.apply(patch);
        updated.validate()?;
        self.employees.update_employee(&updated)?;
        info!(
            "event=employee_update module=service status=ok id={}",
            updated.id
        );
        Ok(1)
    }

    /// Merges `patch` into every matching employee and returns the count.
    ///
    /// Every merged snapshot is validated first, then all are written in one
    /// store transaction, so a failure leaves every match unchanged.
    pub fn update_many(&self, filter: &EmployeeFilter, patch: &EmployeePatch) -> RepoResult<usize> {
        let updated = self
            .employees
            .list_employees(filter)?
            .iter()
            .map(|employee| {
                let merged = employee.apply(patch);
                merged.validate().map(|()| merged)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = self.employees.update_employees(&updated)?;
        info!("event=employee_update_many module=service status=ok updated={count}");
        Ok(count)
    }

    /// Saves a loaded employee after in-memory edits (full replacement).
    ///
    /// # Errors
    /// - `RepoError::EmployeeNotFound` when the record was deleted meanwhile.
    pub fn save(&self, employee: &Employee) -> RepoResult<()> {
        self.employees.update_employee(employee)?;
        info!(
            "event=employee_save module=service status=ok id={}",
            employee.id
        );
        Ok(())
    }

    /// Removes one employee by id.
    pub fn remove(&self, id: EmployeeId) -> RepoResult<()> {
        self.employees.delete_employee(id)?;
        info!("event=employee_remove module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes the first matching employee. Returns 0 or 1.
    pub fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let deleted = self.employees.delete_employees(filter, Some(1))?;
        info!("event=employee_delete_one module=service status=ok deleted={deleted}");
        Ok(deleted)
    }

    /// Deletes every matching employee. Zero matches is not an error.
    pub fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let deleted = self.employees.delete_employees(filter, None)?;
        info!("event=employee_delete_many module=service status=ok deleted={deleted}");
        Ok(deleted)
    }
}
