//! Embedded schema migrations for the record store.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps compiled into the binary.
//! - Bring a connection up to the latest schema inside one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - `PRAGMA user_version` always equals the last applied step.

use crate::db::DbError;
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded on `conn`.
pub fn schema_version(conn: &Connection) -> Result<u32, DbError> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Applies every step newer than the connection's recorded version.
///
/// # Errors
/// - `DbError::StoreTooNew` when the store was written by a
///   newer build.
pub fn apply_migrations(conn: &mut Connection) -> Result<(), DbError> {
    let from_version = schema_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::StoreTooNew {
            found: from_version,
            supported: to_version,
        });
    }
    if from_version == to_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=schema_migrate module=db status=ok from_version={} to_version={}",
        from_version, to_version
    );
    Ok(())
}
