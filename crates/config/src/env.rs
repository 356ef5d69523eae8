//! Environment variable access and `.env` file loading.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Load `KEY=value` definitions from a `.env` file into the process environment.
//! - Expand `$VAR` and `${VAR}` references inside strings.
//!
//! Does NOT handle:
//! - Resolving which `.env` file to load (see `manager.rs`).
//! - Home directory expansion (see `path.rs`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Variables already present in the process environment are never overridden
//!   by a `.env` file.
//! - References to unset variables are left verbatim.

use std::path::Path;

use crate::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Loads the `.env` file at `path` into the process environment.
///
/// # Errors
/// A missing or unreadable file is [`ConfigError::DotenvIo`]; invalid syntax is
/// [`ConfigError::DotenvParse`].
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(dotenvy::Error::LineParse(_, idx)) => Err(ConfigError::DotenvParse {
            path: path.to_path_buf(),
            error_index: idx,
        }),
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
            path: path.to_path_buf(),
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigError::DotenvUnknown {
            path: path.to_path_buf(),
        }),
    }
}

/// Replaces `$NAME` and `${NAME}` with the value of the named environment
/// variable. Unknown variables and malformed references are kept as written.
pub fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match std::env::var(name) {
            Ok(value) if !name.is_empty() => {
                out.push_str(&value);
                rest = &after[consumed..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_empty_and_whitespace_strings() {
        let key = "_JSONCRAFT_TEST_ENV_VAR";
        assert!(env_var_or_none(key).is_none());

        temp_env::with_vars([(key, Some(""))], || {
            assert!(env_var_or_none(key).is_none());
        });

        temp_env::with_vars([(key, Some("   "))], || {
            assert!(env_var_or_none(key).is_none());
        });

        temp_env::with_vars([(key, Some(" value "))], || {
            assert_eq!(env_var_or_none(key), Some("value".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_expand_vars_plain_and_braced() {
        temp_env::with_vars([("_JSONCRAFT_ROOT", Some("/srv/app"))], || {
            assert_eq!(expand_vars("$_JSONCRAFT_ROOT/logs"), "/srv/app/logs");
            assert_eq!(expand_vars("${_JSONCRAFT_ROOT}/logs"), "/srv/app/logs");
            assert_eq!(expand_vars("a${_JSONCRAFT_ROOT}b"), "a/srv/appb");
        });
    }

    #[test]
    #[serial]
    fn test_expand_vars_keeps_unknown_references() {
        temp_env::with_vars([("_JSONCRAFT_UNSET", None::<&str>)], || {
            assert_eq!(expand_vars("$_JSONCRAFT_UNSET/x"), "$_JSONCRAFT_UNSET/x");
            assert_eq!(expand_vars("${_JSONCRAFT_UNSET}/x"), "${_JSONCRAFT_UNSET}/x");
            assert_eq!(expand_vars("${unterminated"), "${unterminated");
            assert_eq!(expand_vars("cost: $5 or $"), "cost: $5 or $");
            assert_eq!(expand_vars("no refs"), "no refs");
        });
    }

    #[test]
    #[serial]
    fn test_load_env_file_sets_variables() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = temp_dir.path().join(".env");
        std::fs::write(&env_path, "_JSONCRAFT_DOTENV_KEY=from-file\n").unwrap();

        temp_env::with_vars([("_JSONCRAFT_DOTENV_KEY", None::<&str>)], || {
            load_env_file(&env_path).unwrap();
            assert_eq!(
                env_var_or_none("_JSONCRAFT_DOTENV_KEY"),
                Some("from-file".to_string())
            );
        });
    }

    #[test]
    #[serial]
    fn test_load_env_file_does_not_override_existing() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = temp_dir.path().join(".env");
        std::fs::write(&env_path, "_JSONCRAFT_DOTENV_KEEP=from-file\n").unwrap();

        temp_env::with_vars([("_JSONCRAFT_DOTENV_KEEP", Some("from-process"))], || {
            load_env_file(&env_path).unwrap();
            assert_eq!(
                env_var_or_none("_JSONCRAFT_DOTENV_KEEP"),
                Some("from-process".to_string())
            );
        });
    }

    #[test]
    fn test_load_env_file_missing_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_env_file(&temp_dir.path().join("absent.env")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DotenvIo {
                kind: std::io::ErrorKind::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_load_env_file_parse_error_does_not_leak_content() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = temp_dir.path().join(".env");
        std::fs::write(&env_path, "SECRET_VALUE_XYZ\n").unwrap();

        let err = load_env_file(&env_path).unwrap_err();
        assert!(matches!(err, ConfigError::DotenvParse { .. }));
        assert!(!err.to_string().contains("SECRET_VALUE_XYZ"));
    }
}
