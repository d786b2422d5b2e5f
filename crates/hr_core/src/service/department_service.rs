//! Department use-case service.
//!
//! # Responsibility
//! - Provide the department CRUD contract consumed by routing layers.
//! - Pick a uniformly random department from the current collection.
//!
//! # Invariants
//! - Candidates are validated before persistence.
//! - Patched records are re-validated as a whole before they are saved.

use crate::model::department::{Department, DepartmentId, DepartmentPatch, NewDepartment};
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

/// Use-case service wrapper for department CRUD operations.
pub struct DepartmentService<R: DepartmentRepository> {
    repo: R,
}

impl<R: DepartmentRepository> DepartmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, assigns a fresh id and persists a department.
    pub fn create(&self, input: NewDepartment) -> RepoResult<Department> {
        let department = Department::create(input).map_err(|err| {
            warn!(
                "event=department_create module=service status=rejected fields={}",
                err.len()
            );
            RepoError::from(err)
        })?;
        self.repo.create_department(&department)?;
        info!(
            "event=department_create module=service status=ok id={}",
            department.id
        );
        Ok(department)
    }

    /// Validates a raw request body and creates the department.
    pub fn create_from_document(&self, candidate: &Value) -> RepoResult<Department> {
        self.create(NewDepartment::from_document(candidate)?)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Department>> {
        self.repo.list_departments()
    }

    pub fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.repo.get_department(id)
    }

    /// Returns the earliest inserted department with exactly this name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        self.repo.find_department_by_name(name)
    }

    /// Picks one department uniformly at random; `None` when empty.
    pub fn find_random<G: Rng + ?Sized>(&self, rng: &mut G) -> RepoResult<Option<Department>> {
        let departments = self.repo.list_departments()?;
        Ok(pick_random(&departments, rng).cloned())
    }

    /// Merges `patch` into the stored department and saves the result.
    ///
    /// # Errors
    /// - `RepoError::DepartmentNotFound` when `id` does not exist.
    /// - `RepoError::Validation` when the merged record is invalid.
    pub fn update_by_id(&self, id: DepartmentId, patch: &DepartmentPatch) -> RepoResult<Department> {
        let current = self
            .repo
            .get_department(id)?
            .ok_or(RepoError::DepartmentNotFound(id))?;

        let updated = current.apply(patch);
        updated.validate()?;
        self.repo.update_department(&updated)?;
        info!("event=department_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Deletes a department by id.
    ///
    /// Employees referencing it are left untouched; their reference simply
    /// stops resolving.
    pub fn delete_by_id(&self, id: DepartmentId) -> RepoResult<()> {
        self.repo.delete_department(id)?;
        info!("event=department_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Deletes every department and returns the number removed.
    pub fn delete_all(&self) -> RepoResult<usize> {
        let deleted = self.repo.delete_all_departments()?;
        info!("event=department_delete_all module=service status=ok deleted={deleted}");
        Ok(deleted)
    }
}

/// Picks one element uniformly at random from a snapshot.
pub fn pick_random<'a, T, G: Rng + ?Sized>(items: &'a [T], rng: &mut G) -> Option<&'a T> {
    items.choose(rng)
}
