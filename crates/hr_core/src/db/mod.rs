//! SQLite record store bootstrap.
//!
//! # Responsibility
//! - Open file or in-memory connections for the department/employee store.
//! - Bring the schema up to date before any repository touches it.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repositories refuse connections whose schema is not current.

use std::fmt;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Store bootstrap and transport failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store file was last migrated by a newer build of this crate.
    StoreTooNew { found: u32, supported: u32 },
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::StoreTooNew { found, supported } => write!(
                f,
                "record store is at schema {found}, this build only knows up to {supported}"
            ),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}
