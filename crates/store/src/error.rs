//! Error types for document store operations.
//!
//! Responsibilities:
//! - Define the error variants surfaced by document I/O and the stores.
//! - Classify errors into the coarse kinds callers branch on.
//!
//! Does NOT handle:
//! - Configuration-level validation (see `jsoncraft-config`).
//!
//! Invariants:
//! - File-access failures and malformed content are always distinct variants.
//! - Every I/O-derived variant carries the path it was raised for.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the store crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading, writing or navigating a document.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be opened, created, read or written.
    #[error("File error accessing {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file content is not valid JSON of the expected shape.
    #[error("Error decoding JSON data at {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The in-memory value could not be serialized.
    #[error("Error encoding JSON data for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A nested operation was called without any key segments.
    #[error("At least one key is required")]
    EmptyKeyPath,
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    File,
    Decode,
    Encode,
    /// Programmer error, such as an empty key path.
    Validation,
}

impl StoreError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Decode {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn encode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Encode {
            path: path.into(),
            source,
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::File { .. } => ErrorKind::File,
            StoreError::Decode { .. } => ErrorKind::Decode,
            StoreError::Encode { .. } => ErrorKind::Encode,
            StoreError::EmptyKeyPath => ErrorKind::Validation,
        }
    }
}
