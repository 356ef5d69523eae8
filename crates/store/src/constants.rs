//! Default values shared by the document stores.

/// Default number of spaces used when pretty-printing documents.
pub const DEFAULT_INDENT: usize = 2;

/// Extension that replaces a document's own extension for its backup file.
///
/// `config.json` is backed up to `config.backup.json`.
pub const BACKUP_EXTENSION: &str = "backup.json";

/// Suffix appended to a document's file name while it is being written.
pub const TEMP_SUFFIX: &str = ".tmp";
