//! Centralized defaults for the configuration manager.

// =============================================================================
// Paths
// =============================================================================

/// Log directory used when a logger configuration does not name a path.
pub const DEFAULT_LOG_DIR: &str = "/var/log/jsoncraft/";

/// Environment file consulted by `get_environment` when no key is configured.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Extension of log files created inside a configured log directory.
pub const LOG_FILE_EXTENSION: &str = "log";

// =============================================================================
// Logging
// =============================================================================

/// Level used by `get_logger` when neither the caller nor the configuration
/// names one.
pub const DEFAULT_LOG_LEVEL: &str = "DEBUG";

/// Separator between segments of a dotted configuration key.
pub const KEY_SEPARATOR: char = '.';
