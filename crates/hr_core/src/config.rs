//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve store path and logging settings once at startup.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Store file location.
pub const DB_PATH_VAR: &str = "HR_DB_PATH";
/// One of `trace|debug|info|warn|error`.
pub const LOG_LEVEL_VAR: &str = "HR_LOG_LEVEL";
/// Absolute directory for rotated log files.
pub const LOG_DIR_VAR: &str = "HR_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "hr_records.sqlite3";

/// Settings the core needs to bootstrap a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}
