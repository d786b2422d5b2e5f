//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `departments` table.
//! - Serve name/id lookups used by employee reference resolution.
//!
//! # Invariants
//! - Writes call `Department::validate()` before SQL mutations.
//! - Listing order is insertion order (`seq ASC`).
//! - Name lookups return the earliest inserted match.

use crate::model::department::{Department, DepartmentId};
use crate::repo::{ensure_table_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT uuid, name FROM departments";

const REQUIRED_COLUMNS: &[&str] = &["seq", "uuid", "name", "created_at", "updated_at"];

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn create_department(&self, department: &Department) -> RepoResult<DepartmentId>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    fn find_department_by_name(&self, name: &str) -> RepoResult<Option<Department>>;
    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    /// Replaces all mutable fields of an existing department.
    fn update_department(&self, department: &Department) -> RepoResult<()>;
    fn delete_department(&self, id: DepartmentId) -> RepoResult<()>;
    /// Removes every department and returns how many rows were deleted.
    fn delete_all_departments(&self) -> RepoResult<usize>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Rejects connections whose schema is missing or outdated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "departments", REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, department: &Department) -> RepoResult<DepartmentId> {
        department.validate()?;

        self.conn.execute(
            "INSERT INTO departments (uuid, name) VALUES (?1, ?2);",
            params![department.id.to_string(), department.name.as_str()],
        )?;

        Ok(department.id)
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.conn
            .query_row(
                &format!("{DEPARTMENT_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                read_department_columns,
            )
            .optional()?
            .map(into_department)
            .transpose()
    }

    fn find_department_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        self.conn
            .query_row(
                &format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1 ORDER BY seq ASC LIMIT 1;"),
                [name],
                read_department_columns,
            )
            .optional()?
            .map(into_department)
            .transpose()
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let rows = stmt
            .query_map([], read_department_columns)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(into_department).collect()
    }

    fn update_department(&self, department: &Department) -> RepoResult<()> {
        department.validate()?;

        let changed = self.conn.execute(
            "UPDATE departments
             SET
                name = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![department.name.as_str(), department.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::DepartmentNotFound(department.id));
        }
        Ok(())
    }

    fn delete_department(&self, id: DepartmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::DepartmentNotFound(id));
        }
        Ok(())
    }

    fn delete_all_departments(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM departments;", [])?)
    }
}

fn read_department_columns(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("uuid")?, row.get("name")?))
}

fn into_department((uuid, name): (String, String)) -> RepoResult<Department> {
    let department = Department {
        id: parse_uuid(&uuid, "departments.uuid")?,
        name,
    };
    department.validate().map_err(|err| {
        RepoError::InvalidData(format!("department {uuid} failed validation: {err}"))
    })?;
    Ok(department)
}
