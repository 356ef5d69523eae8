//! Filesystem path evaluation for configured paths.
//!
//! Responsibilities:
//! - Parse the `type` field of a path configuration (`file` or `dir`).
//! - Expand environment references and a leading `~`.
//! - Create missing files and directory trees.
//!
//! Does NOT handle:
//! - Looking up path configurations by key (see `manager.rs`).
//!
//! Invariants:
//! - Existing paths are never truncated or modified.
//! - A created file is empty; its parent directories are created first.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::env::{env_var_or_none, expand_vars};
use crate::error::ConfigError;

/// Kind of filesystem entry a configured path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathKind {
    #[default]
    File,
    Dir,
}

impl PathKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::File => "file",
            PathKind::Dir => "dir",
        }
    }
}

impl FromStr for PathKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(PathKind::File),
            "dir" => Ok(PathKind::Dir),
            other => Err(ConfigError::InvalidPathType(other.to_string())),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    env_var_or_none("HOME")
        .map(PathBuf::from)
        .or_else(|| directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
}

/// Expands `$VAR`/`${VAR}` references, then a leading `~` or `~/`.
///
/// `~user` forms and an unresolvable home directory leave the tilde in place.
pub fn expand_path(raw: &str) -> String {
    let expanded = expand_vars(raw);

    let rest = if expanded == "~" {
        Some("")
    } else {
        expanded.strip_prefix("~/")
    };

    match (rest, home_dir()) {
        (Some(""), Some(home)) => home.to_string_lossy().into_owned(),
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => expanded,
    }
}

/// Creates `path` as `kind` when nothing exists there yet.
pub fn ensure_exists(path: &Path, kind: PathKind) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }

    let creation_error = |source| ConfigError::PathCreation {
        path: path.to_path_buf(),
        source,
    };

    match kind {
        PathKind::Dir => std::fs::create_dir_all(path).map_err(creation_error)?,
        PathKind::File => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(creation_error)?;
            }
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(creation_error)?;
        }
    }

    tracing::debug!(path = %path.display(), kind = kind.as_str(), "Created configured path");
    Ok(())
}
