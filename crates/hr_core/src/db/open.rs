//! Connection bootstrap for the record store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Set the pragmas the repositories rely on, then migrate.
//!
//! # Invariants
//! - Returned connections are fully migrated.
//! - Concurrent writers wait up to `BUSY_TIMEOUT` instead of failing fast.

use super::migrations::apply_migrations;
use super::DbError;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a store file and applies pending migrations.
///
/// The connection is meant to live for the whole process and be borrowed by
/// repositories.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, DbError> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory store with the current schema.
pub fn open_db_in_memory() -> Result<Connection, DbError> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> Result<Connection, DbError> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn bootstrap_connection(conn: &mut Connection) -> Result<(), DbError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
