//! Process-wide configuration manager handle.
//!
//! Applications that want a single configuration for the whole process
//! install one manager at startup and fetch it anywhere afterwards.
//!
//! Invariants:
//! - The first installed manager stays for the life of the process.
//! - Later installs are ignored with a warning and return the existing handle.

use std::sync::{Mutex, OnceLock};

use crate::manager::ConfigManager;

static SHARED: OnceLock<Mutex<ConfigManager>> = OnceLock::new();

/// Installs `manager` as the shared configuration, unless one already is.
pub fn install(manager: ConfigManager) -> &'static Mutex<ConfigManager> {
    let path = manager.file_path().to_path_buf();
    let mut installed = false;

    let handle = SHARED.get_or_init(|| {
        installed = true;
        Mutex::new(manager)
    });

    if installed {
        tracing::debug!(path = %path.display(), "Installed shared configuration manager");
    } else {
        tracing::warn!(
            path = %path.display(),
            "Shared configuration manager already installed; ignoring new instance"
        );
    }
    handle
}

/// Returns the shared configuration, if one has been installed.
pub fn get() -> Option<&'static Mutex<ConfigManager>> {
    SHARED.get()
}
