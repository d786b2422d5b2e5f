//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Start size-rotated file logging once per process.
//! - Record panics as sanitized, single-line events.
//!
//! # Invariants
//! - Repeating `init_logging` with identical settings is a no-op.
//! - Switching level or directory after initialization is rejected.
//! - Initialization never panics.
//! - Events carry ids and counts only, never personal field values.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "hr_records";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Settings the running logger was started with.
struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn matches(&self, level: LevelFilter, dir: &Path) -> Result<(), String> {
        if self.dir != dir {
            return Err(format!(
                "logger already writes to `{}`, cannot move it to `{}`",
                self.dir.display(),
                dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logger already runs at `{}`, cannot change it to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging was already started with a different level or directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let dir = absolute_dir(log_dir)?;

    ACTIVE
        .get_or_try_init(|| start_file_logger(level, &dir))?
        .matches(level, &dir)
}

/// Returns `(level, log_dir)` once logging is active.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_file_logger(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;

    let spec = LogSpecification::builder().default(level).build();
    let handle = Logger::with(spec)
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start file logger: {err}"))?;

    if PANIC_HOOK.set(()).is_ok() {
        install_panic_hook();
    }

    info!(
        "event=logging_init module=core status=ok level={} log_dir={} version={}",
        level,
        dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

/// Accepts level names case-insensitively, plus `warning` for `warn`.
/// `off` is rejected: disabling logging means not calling `init_logging`.
fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    let name = match raw.trim() {
        alias if alias.eq_ignore_ascii_case("warning") => "warn",
        name => name,
    };
    match LevelFilter::from_str(name) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{}`; expected trace|debug|info|warn|error",
            raw.trim()
        )),
        Ok(level) => Ok(level),
    }
}

fn absolute_dir(raw: &str) -> Result<PathBuf, String> {
    let dir = PathBuf::from(raw.trim());
    if dir.as_os_str().is_empty() {
        Err("log_dir cannot be empty".to_string())
    } else if dir.is_relative() {
        Err(format!("log_dir must be absolute, got `{}`", dir.display()))
    } else {
        Ok(dir)
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            one_line(&panic_payload(info.payload()), PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Payloads may echo record fields: flatten to one line and cap the length.
fn one_line(text: &str, limit: usize) -> String {
    let mut out: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(limit)
        .collect();
    if text.chars().nth(limit).is_some() {
        out.push_str("...");
    }
    out
}
