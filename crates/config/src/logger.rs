//! Named logger registry backed by `tracing` dispatchers.
//!
//! Responsibilities:
//! - Parse level names into `LevelFilter`s.
//! - Build file and stdout loggers in one of the supported formats.
//! - Hand out one shared handle per logger name for the whole process.
//!
//! Does NOT handle:
//! - Deciding where a logger writes (see `ConfigManager::get_logger`).
//! - Installing a global default subscriber. Events reach a logger only
//!   inside [`ConfigLogger::in_scope`].
//!
//! Invariants:
//! - A logger name maps to exactly one handle; later requests for the same
//!   name return it unchanged and never add a second writer.
//! - File loggers append and never rotate.

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::ConfigError;

/// Line layout of emitted events.
///
/// Every format includes timestamp, level, source file, line and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

/// Parses a level name, case-insensitively.
///
/// Accepts `TRACE`, `DEBUG`, `INFO`, `WARN`/`WARNING`, `ERROR`, `CRITICAL`
/// (same as `ERROR`) and `NOTSET` (same as `TRACE`).
pub fn parse_level(name: &str) -> Result<LevelFilter, ConfigError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "NOTSET" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(name.to_string())),
    }
}

/// A named logger that owns its own dispatcher.
#[derive(Debug)]
pub struct ConfigLogger {
    name: String,
    path: Option<PathBuf>,
    level: LevelFilter,
    dispatch: Dispatch,
}

impl ConfigLogger {
    /// Runs `f` with this logger as the thread's default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log file, or `None` for the stdout logger.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

fn build_dispatch<W>(writer: W, level: LevelFilter, format: LogFormat, ansi: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_max_level(level);

    match format {
        LogFormat::Full => Dispatch::new(builder.finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

type Registry = Mutex<HashMap<String, Arc<ConfigLogger>>>;

fn registry() -> &'static Registry {
    static LOGGERS: OnceLock<Registry> = OnceLock::new();
    LOGGERS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the logger registered under `name`, or registers the one built
/// by `build`.
fn get_or_register<E>(
    name: &str,
    build: impl FnOnce() -> Result<ConfigLogger, E>,
) -> Result<Arc<ConfigLogger>, E> {
    let mut loggers = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = loggers.get(name) {
        tracing::debug!(logger = name, "Reusing registered logger");
        return Ok(Arc::clone(existing));
    }

    let logger = Arc::new(build()?);
    loggers.insert(name.to_string(), Arc::clone(&logger));
    Ok(logger)
}

/// Returns the logger registered under `name`, if any.
pub fn registered(name: &str) -> Option<Arc<ConfigLogger>> {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Returns the file logger `name`, creating it to append to `path`.
///
/// The file's parent directory must already exist.
pub fn register_file_logger(
    name: &str,
    path: &Path,
    level: LevelFilter,
    format: LogFormat,
) -> Result<Arc<ConfigLogger>, ConfigError> {
    get_or_register(name, || {
        let init_error = |message: String| ConfigError::LoggerInit {
            path: path.to_path_buf(),
            message,
        };

        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| init_error("log path has no file name".to_string()))?;
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(directory)
            .map_err(|e| init_error(e.to_string()))?;

        tracing::debug!(logger = name, path = %path.display(), "Registered file logger");
        Ok(ConfigLogger {
            name: name.to_string(),
            path: Some(path.to_path_buf()),
            level,
            dispatch: build_dispatch(appender, level, format, false),
        })
    })
}

/// Returns the stdout logger `name`, creating it on first use.
pub fn default_logger(name: &str, level: LevelFilter) -> Arc<ConfigLogger> {
    let handle = get_or_register(name, || {
        Ok::<_, Infallible>(ConfigLogger {
            name: name.to_string(),
            path: None,
            level,
            dispatch: build_dispatch(std::io::stdout, level, LogFormat::Full, true),
        })
    });

    match handle {
        Ok(logger) => logger,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level_accepts_aliases_case_insensitively() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("Warning").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::ERROR);
        assert_eq!(parse_level("notset").unwrap(), LevelFilter::TRACE);
    }

    #[test]
    fn test_parse_level_rejects_unknown_names() {
        let err = parse_level("LOUD").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(ref l) if l == "LOUD"));
    }

    #[test]
    fn test_file_logger_writes_events_in_scope() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("unit_file_logger.log");

        let logger = register_file_logger(
            "logger_unit_file_logger",
            &path,
            LevelFilter::INFO,
            LogFormat::Full,
        )
        .unwrap();
        logger.in_scope(|| {
            tracing::info!("kept message");
            tracing::debug!("filtered message");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("kept message"));
        assert!(contents.contains("INFO"));
        assert!(contents.contains("logger.rs"));
        assert!(!contents.contains("filtered message"));
        assert_eq!(logger.path(), Some(path.as_path()));
        assert_eq!(logger.level(), LevelFilter::INFO);
    }

    #[test]
    fn test_json_format_emits_one_object_per_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("unit_json.log");

        let logger =
            register_file_logger("logger_unit_json", &path, LevelFilter::DEBUG, LogFormat::Json)
                .unwrap();
        logger.in_scope(|| tracing::warn!("structured"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["message"], "structured");
    }

    #[test]
    fn test_registration_is_idempotent_per_name() {
        let temp_dir = TempDir::new().unwrap();
        let first_path = temp_dir.path().join("first.log");
        let second_path = temp_dir.path().join("second.log");

        let first = register_file_logger(
            "logger_unit_idempotent",
            &first_path,
            LevelFilter::INFO,
            LogFormat::Compact,
        )
        .unwrap();
        let second = register_file_logger(
            "logger_unit_idempotent",
            &second_path,
            LevelFilter::ERROR,
            LogFormat::Json,
        )
        .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.path(), Some(first_path.as_path()));
        assert!(Arc::ptr_eq(
            &first,
            &registered("logger_unit_idempotent").unwrap()
        ));
    }

    #[test]
    fn test_default_logger_is_stdout_and_shared() {
        let first = default_logger("logger_unit_stdout", LevelFilter::DEBUG);
        let second = default_logger("logger_unit_stdout", LevelFilter::ERROR);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.path().is_none());
        assert_eq!(first.name(), "logger_unit_stdout");
    }
}
