//! Configuration manager over a JSON mapping document.
//!
//! Responsibilities:
//! - Read and write values addressed by dotted keys (`"app.logs.general"`).
//! - Resolve configured file and directory paths, creating them on demand.
//! - Load `.env` files and read environment variables.
//! - Provision named file loggers from configuration entries.
//!
//! Does NOT handle:
//! - JSON file I/O (see `jsoncraft-store`).
//! - Process-wide sharing (see `shared.rs`).
//!
//! Invariants:
//! - Construction never touches the filesystem; `load` is explicit.
//! - `set_value` replaces every intermediate mapping along the key path.
//! - A stored JSON `null` reads the same as an absent key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsoncraft_store::constants::DEFAULT_INDENT;
use jsoncraft_store::{DocumentTemplate, JsonMap, Map};
use serde_json::Value;

use crate::constants::{
    DEFAULT_ENV_FILE, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL, KEY_SEPARATOR, LOG_FILE_EXTENSION,
};
use crate::env::{env_var_or_none, load_env_file};
use crate::error::{ConfigError, json_type_name};
use crate::logger::{ConfigLogger, LogFormat, parse_level, register_file_logger};
use crate::path::{PathKind, ensure_exists, expand_path};

/// Dotted-key access to a JSON configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigManager {
    map: JsonMap,
    indent: usize,
}

fn split_key(key: &str) -> Vec<&str> {
    key.split(KEY_SEPARATOR).collect()
}

impl ConfigManager {
    /// Creates a manager for `path`, seeded with `initial` or `{}`.
    pub fn new(path: impl Into<PathBuf>, initial: Option<Map>) -> Self {
        Self {
            map: JsonMap::new(path, initial),
            indent: DEFAULT_INDENT,
        }
    }

    /// Sets the indentation used by `save` and `backup`.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn file_path(&self) -> &Path {
        self.map.file_path()
    }

    pub fn map(&self) -> &JsonMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut JsonMap {
        &mut self.map
    }

    pub fn data(&self) -> &Map {
        self.map.data()
    }

    /// Replaces the in-memory configuration with the file's contents.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        self.map.load()?;
        tracing::debug!(path = %self.file_path().display(), "Loaded configuration");
        Ok(())
    }

    /// Writes the in-memory configuration to its file.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.map.save(None, self.indent)?;
        tracing::debug!(path = %self.file_path().display(), "Saved configuration");
        Ok(())
    }

    /// Copies the configuration file to its `.backup.json` sibling.
    pub fn backup(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.map.backup(self.indent)?)
    }

    /// Returns the value at a dotted key.
    ///
    /// Missing keys, paths through non-mappings and stored `null`s are `None`.
    /// Stored `0`, `false` and `""` are returned as-is.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.map
            .read_nested(&split_key(key))
            .ok()
            .flatten()
            .filter(|value| !value.is_null())
    }

    /// Returns the value at a dotted key, or `default` when there is none.
    pub fn get_value_or(&self, key: &str, default: Value) -> Value {
        self.get_value(key).cloned().unwrap_or(default)
    }

    /// Sets the value at a dotted key.
    ///
    /// Every mapping along the way is replaced with a fresh one, so siblings
    /// of the path are discarded.
    pub fn set_value(&mut self, key: &str, value: Value) -> bool {
        matches!(self.map.update_nested_default(value, &split_key(key)), Ok(true))
    }

    /// Resolves the path configured at `key`.
    ///
    /// - Absent: returns `default_path`.
    /// - A string: returned as written, without expansion or creation.
    /// - A mapping `{"path": .., "type": "file" | "dir"}`: a missing `type`
    ///   falls back to `default_type`; any other value, `null` included, is
    ///   rejected. The path is expanded (`$VAR`, `${VAR}`, leading `~`) and
    ///   created when missing.
    pub fn evaluate_path(
        &self,
        key: &str,
        default_path: Option<&str>,
        default_type: PathKind,
    ) -> Result<Option<String>, ConfigError> {
        let Some(info) = self.get_value(key) else {
            return Ok(default_path.map(str::to_string));
        };

        let info = match info {
            Value::String(path) => return Ok(Some(path.clone())),
            Value::Object(info) => info,
            other => {
                return Err(ConfigError::InvalidPathValue {
                    key: key.to_string(),
                    found: json_type_name(other),
                });
            }
        };

        let kind = match info.get("type") {
            None => default_type,
            Some(Value::String(kind)) => kind.parse()?,
            Some(other) => return Err(ConfigError::InvalidPathType(other.to_string())),
        };

        let raw = match info.get("path") {
            Some(Value::String(raw)) => raw,
            other => {
                return Err(ConfigError::InvalidPathValue {
                    key: key.to_string(),
                    found: other.map_or("null", json_type_name),
                });
            }
        };

        let evaluated = expand_path(raw);
        ensure_exists(Path::new(&evaluated), kind)?;
        tracing::debug!(key, path = %evaluated, "Evaluated configured path");
        Ok(Some(evaluated))
    }

    /// Loads the `.env` file configured at `key` and reads `variable`.
    ///
    /// Without a key, or when the key is absent, `.env` in the working
    /// directory is used. Variables already set in the process win over the
    /// file.
    pub fn get_environment(
        &self,
        variable: &str,
        key: Option<&str>,
    ) -> Result<String, ConfigError> {
        let env_path = match key {
            Some(key) => self.evaluate_path(key, Some(DEFAULT_ENV_FILE), PathKind::File)?,
            None => None,
        }
        .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string());

        load_env_file(Path::new(&env_path))?;

        env_var_or_none(variable).ok_or_else(|| ConfigError::MissingEnvVar(variable.to_string()))
    }

    /// Returns the file logger `logger_name` configured at `key`.
    ///
    /// The entry's `path` is evaluated as a file (default
    /// [`DEFAULT_LOG_DIR`]); a directory path logs to
    /// `<dir>/<logger_name>.log`. The entry's `level` wins over `level`.
    /// Loggers are shared by name: once `logger_name` exists, later calls
    /// return it without adding a writer.
    pub fn get_logger(
        &self,
        key: &str,
        logger_name: &str,
        level: Option<&str>,
        format: Option<LogFormat>,
    ) -> Result<Arc<ConfigLogger>, ConfigError> {
        let info = match self.get_value(key) {
            None => return Err(ConfigError::MissingLoggerConfig(key.to_string())),
            Some(Value::Object(info)) => info,
            Some(other) => {
                return Err(ConfigError::InvalidLoggerConfig {
                    key: key.to_string(),
                    found: json_type_name(other),
                });
            }
        };

        let level = match info.get("level") {
            None | Some(Value::Null) => parse_level(level.unwrap_or(DEFAULT_LOG_LEVEL))?,
            Some(Value::String(name)) => parse_level(name)?,
            Some(other) => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        };

        let evaluated = self
            .evaluate_path(key, Some(DEFAULT_LOG_DIR), PathKind::File)?
            .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());

        let mut log_path = PathBuf::from(evaluated);
        if log_path.is_dir() {
            log_path = log_path.join(format!("{logger_name}.{LOG_FILE_EXTENSION}"));
        }

        register_file_logger(logger_name, &log_path, level, format.unwrap_or_default())
    }
}
