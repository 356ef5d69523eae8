//! The load/save/backup lifecycle shared by every document store.
//!
//! Responsibilities:
//! - Pair an immutable file path with an optional in-memory value.
//! - Load the value from disk, save it back, and back up the on-disk file.
//! - Create the document's parent directory on demand.
//!
//! Does NOT handle:
//! - Shape-specific operations (see `map.rs` and `list.rs`).
//!
//! Invariants:
//! - The file path never changes after construction.
//! - A failed load leaves the in-memory value untouched.
//! - `backup` never reads or writes the in-memory value.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::constants::BACKUP_EXTENSION;
use crate::error::{Result, StoreError};
use crate::io::{read_json, write_json};

/// A file path plus the document value associated with it.
///
/// The value is `None` until it is seeded, loaded, or saved explicitly.
/// A `null` document on disk also loads as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument<T> {
    path: PathBuf,
    data: Option<T>,
}

impl<T> JsonDocument<T> {
    /// Creates a document for `path`, optionally seeded with `initial`.
    pub fn new(path: impl Into<PathBuf>, initial: Option<T>) -> Self {
        Self {
            path: path.into(),
            data: initial,
        }
    }

    /// Returns the path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory value, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub(crate) fn data_slot(&mut self) -> &mut Option<T> {
        &mut self.data
    }

    /// Returns the sibling path `backup` writes to.
    ///
    /// The last extension is replaced, so `settings.json` becomes
    /// `settings.backup.json`.
    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension(BACKUP_EXTENSION)
    }

    /// Creates every missing parent directory of the document path.
    ///
    /// # Errors
    /// Returns [`StoreError::File`] if a directory cannot be created, for
    /// example because a path component is a regular file.
    pub fn make_directory(&self) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|e| StoreError::file(parent, e))
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Replaces the in-memory value with the content of the backing file.
    pub fn load(&mut self) -> Result<()> {
        let data: Option<T> = read_json(&self.path)?;
        self.data = data;

        tracing::debug!(path = %self.path.display(), "JSON document loaded");
        Ok(())
    }

    /// Writes `data` (adopting it as the new value) or, when `None`, the
    /// current value to the backing file.
    pub fn save(&mut self, data: Option<T>, indent: usize) -> Result<()> {
        match data {
            Some(data) => {
                write_json(&self.path, &data, indent)?;
                self.data = Some(data);
            }
            None => write_json(&self.path, &self.data, indent)?,
        }
        Ok(())
    }

    /// Copies the current on-disk content to [`backup_path`](Self::backup_path),
    /// re-serialized with `indent` spaces. Returns the backup path.
    ///
    /// # Errors
    /// [`StoreError::File`] or [`StoreError::Decode`] if the source file cannot
    /// be read; [`StoreError::File`] or [`StoreError::Encode`] if the backup
    /// cannot be written.
    pub fn backup(&self, indent: usize) -> Result<PathBuf> {
        let content: serde_json::Value = read_json(&self.path)?;
        let backup_path = self.backup_path();
        write_json(&backup_path, &content, indent)?;

        tracing::debug!(
            path = %self.path.display(),
            backup_path = %backup_path.display(),
            "JSON document backed up"
        );
        Ok(backup_path)
    }
}

/// Lifecycle operations shared by document stores.
///
/// Implementors only expose their [`JsonDocument`]; the lifecycle methods
/// are provided.
pub trait DocumentTemplate {
    /// The in-memory document type.
    type Data: Serialize + DeserializeOwned;

    fn document(&self) -> &JsonDocument<Self::Data>;

    fn document_mut(&mut self) -> &mut JsonDocument<Self::Data>;

    /// Returns the path of the backing file.
    fn file_path(&self) -> &Path {
        self.document().file_path()
    }

    /// Replaces the in-memory value with the content of the backing file.
    fn load(&mut self) -> Result<()> {
        self.document_mut().load()
    }

    /// Writes `data` (adopting it) or the current value to the backing file.
    fn save(&mut self, data: Option<Self::Data>, indent: usize) -> Result<()> {
        self.document_mut().save(data, indent)
    }

    /// Backs up the on-disk file without touching the in-memory value.
    fn backup(&self, indent: usize) -> Result<PathBuf> {
        self.document().backup(indent)
    }

    /// Creates the parent directories of the backing file.
    fn make_directory(&self) -> Result<()> {
        self.document().make_directory()
    }
}
