//! Whole-document JSON file I/O.
//!
//! Responsibilities:
//! - Read a JSON file into a typed value.
//! - Write a value to a JSON file with configurable indentation.
//! - Re-format a JSON file's current content as a pretty string.
//! - Read a file, falling back to writing a default when its content is corrupt.
//!
//! Does NOT handle:
//! - Tracking a document's in-memory value (see `document.rs`).
//! - Backup naming or directory creation (see `document.rs`).
//!
//! Invariants:
//! - A value is fully serialized before its target file is touched.
//! - Writes go to a sibling temp file first, then rename over the target.
//! - Overwriting a file keeps its permissions.
//! - Only decode failures trigger the default-writing fallback; file-access
//!   failures always propagate.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde_json::ser::PrettyFormatter;

use crate::constants::TEMP_SUFFIX;
use crate::error::{Result, StoreError};

/// Serializes `value` as pretty JSON indented by `indent` spaces.
///
/// The output has no trailing newline.
pub fn to_pretty_string<T>(value: &T, indent: usize) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
{
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut buf,
        PrettyFormatter::with_indent(indent.as_bytes()),
    );
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}

/// Reads and parses the JSON file at `path`.
///
/// # Errors
/// Returns [`StoreError::File`] if the file cannot be read and
/// [`StoreError::Decode`] if its content is not valid JSON of type `T`.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| StoreError::file(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(path, e))
}

/// Reads the JSON file at `path` and returns it re-serialized with `indent`
/// spaces. The file itself is not modified.
pub fn dump_json(path: impl AsRef<Path>, indent: usize) -> Result<String> {
    let path = path.as_ref();
    let value: serde_json::Value = read_json(path)?;
    to_pretty_string(&value, indent).map_err(|e| StoreError::encode(path, e))
}

/// Serializes `content` and overwrites the file at `path` with it.
///
/// # Errors
/// Returns [`StoreError::Encode`] if `content` cannot be serialized, in which
/// case the file is left untouched, and [`StoreError::File`] if the file
/// cannot be written.
pub fn write_json<T>(path: impl AsRef<Path>, content: &T, indent: usize) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let text = to_pretty_string(content, indent).map_err(|e| StoreError::encode(path, e))?;
    write_atomic(path, text.as_bytes())?;

    tracing::debug!(path = %path.display(), "JSON document written");
    Ok(())
}

/// Reads the JSON file at `path`, or writes `default` there if the file's
/// content cannot be decoded.
///
/// Returns the decoded value, or `default` after it has been written.
///
/// # Errors
/// File-access failures (missing file, permission denied, ...) propagate
/// as [`StoreError::File`] without writing anything.
pub fn read_or_init_json<T>(path: impl AsRef<Path>, default: T, indent: usize) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    match read_json(path) {
        Ok(value) => Ok(value),
        Err(StoreError::Decode { source, .. }) => {
            tracing::warn!(
                path = %path.display(),
                error = %source,
                "Could not decode JSON document, writing default content"
            );
            write_json(path, &default, indent)?;
            Ok(default)
        }
        Err(e) => Err(e),
    }
}

/// Writes `contents` to a temp file beside `path`, then renames it over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path)?;

    fs::write(&temp_path, contents).map_err(|e| StoreError::file(path, e))?;

    // Keep the target's permissions across the rename.
    if let Ok(existing) = fs::metadata(path)
        && let Err(e) = fs::set_permissions(&temp_path, existing.permissions())
    {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::file(path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::file(path, e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::file(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        ));
    };
    let mut temp_name = file_name.to_os_string();
    temp_name.push(TEMP_SUFFIX);
    Ok(path.with_file_name(temp_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("test.temp.json");
        write_json(&path, &json!({"test": "data"}), 2).unwrap();
        path
    }

    #[test]
    fn test_read_json() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        let value: Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"test": "data"}));
    }

    #[test]
    fn test_dump_json_matches_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        assert_eq!(dump_json(&path, 2).unwrap(), "{\n  \"test\": \"data\"\n}");
    }

    #[test]
    fn test_dump_json_custom_indent() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        assert_eq!(dump_json(&path, 4).unwrap(), "{\n    \"test\": \"data\"\n}");
    }

    #[test]
    fn test_read_or_init_keeps_valid_content() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);

        let value = read_or_init_json(&path, json!({"another": "data"}), 2).unwrap();
        assert_eq!(value, json!({"test": "data"}));

        let on_disk: Value = read_json(&path).unwrap();
        assert_eq!(on_disk, json!({"test": "data"}));
    }

    #[test]
    fn test_read_or_init_rewrites_malformed_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json");
        fs::write(&path, "{\"key\": \"value\"").unwrap();

        let value = read_or_init_json(&path, json!({"fresh": true}), 2).unwrap();
        assert_eq!(value, json!({"fresh": true}));

        let on_disk: Value = read_json(&path).unwrap();
        assert_eq!(on_disk, json!({"fresh": true}));
    }

    #[test]
    fn test_read_or_init_propagates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let err = read_or_init_json(&path, json!({}), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
        assert!(!path.exists(), "default must not be written on file errors");
    }

    #[test]
    fn test_read_missing_file_is_file_error() {
        let dir = TempDir::new().unwrap();
        let err = read_json::<Value>(dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }

    #[test]
    fn test_read_directory_is_file_error() {
        let dir = TempDir::new().unwrap();
        let err = read_json::<Value>(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }

    #[test]
    fn test_read_wrong_shape_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[{\"a\": 1}]").unwrap();

        let err = read_json::<crate::Map>(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        let temp = temp_path_for(&path).unwrap();
        assert!(path.exists());
        assert!(!temp.exists());
    }

    #[test]
    fn test_write_into_missing_directory_is_file_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("data.json");
        let err = write_json(&path, &json!({}), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::File);
    }

    #[test]
    fn test_encode_failure_leaves_file_untouched() {
        use std::collections::BTreeMap;

        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);

        // Non-string map keys cannot be encoded as a JSON object.
        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], "value");

        let err = write_json(&path, &bad, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);

        let on_disk: Value = read_json(&path).unwrap();
        assert_eq!(on_disk, json!({"test": "data"}));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = fixture(&dir);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        write_json(&path, &json!({"secret": "value"}), 2).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        let on_disk: Value = read_json(&path).unwrap();
        assert_eq!(on_disk, json!({"secret": "value"}));
    }
}
