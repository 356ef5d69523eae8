//! Error types for the configuration manager.
//!
//! Responsibilities:
//! - Define error variants for path evaluation, environment loading and
//!   logger provisioning.
//! - Wrap document store errors for unified handling.
//!
//! Invariants:
//! - Validation variants name the offending key or value.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

use jsoncraft_store::{ErrorKind, StoreError};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while using a [`ConfigManager`](crate::ConfigManager).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid path type: {0}")]
    InvalidPathType(String),

    #[error("Expected a string for path at '{key}' but got {found}")]
    InvalidPathValue { key: String, found: &'static str },

    #[error("Failed to create path {path}: {source}")]
    PathCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Logger configuration for {0} not found.")]
    MissingLoggerConfig(String),

    #[error("Logger configuration for {key} must be a mapping, got {found}")]
    InvalidLoggerConfig { key: String, found: &'static str },

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Failed to initialize logger at {path}: {message}")]
    LoggerInit { path: PathBuf, message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error("Failed to parse .env file {path} at position {error_index}")]
    DotenvParse { path: PathBuf, error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to load .env file {path}: {kind}")]
    DotenvIo { path: PathBuf, kind: IoErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file {path}")]
    DotenvUnknown { path: PathBuf },

    #[error("Failed to find environment variable `{0}`")]
    MissingEnvVar(String),
}

impl ConfigError {
    /// Returns the coarse kind of this error.
    ///
    /// Everything that is not a store or filesystem failure is a validation
    /// error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Store(e) => e.kind(),
            ConfigError::PathCreation { .. } | ConfigError::LoggerInit { .. } => ErrorKind::File,
            _ => ErrorKind::Validation,
        }
    }
}

/// Human-readable JSON type name used in validation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
