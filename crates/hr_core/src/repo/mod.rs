//! Repository contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define CRUD contracts for departments and employees.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Id-targeted writes report `NotFound`; bulk writes report counts.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::department::DepartmentId;
use crate::model::employee::EmployeeId;
use crate::model::validate::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod department_repo;
pub mod employee_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by department and employee persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed field validation; nothing was written.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    DepartmentNotFound(DepartmentId),
    EmployeeNotFound(EmployeeId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Whether this error means the targeted record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DepartmentNotFound(_) | Self::EmployeeNotFound(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DepartmentNotFound(id) => write!(f, "department not found: {id}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies that `conn` is migrated and carries `table` with `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let existing = table_columns(conn, table)?;
    if existing.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }
    if let Some(column) = columns
        .iter()
        .copied()
        .find(|column| !existing.iter().any(|name| name.as_str() == *column))
    {
        return Err(RepoError::MissingRequiredColumn { table, column });
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
