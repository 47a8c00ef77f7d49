//! Shared configuration paths for the field-ops tracker.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.fieldops/`:
//!
//! ```text
//! ~/.fieldops/
//! ├── config/       # catalog.json and other user configuration
//! └── data/         # File-backed work item store
//! ```
//!
//! # Environment Variables
//!
//! - `FIELDOPS_STATE_DIR`: Override the base state directory
//! - `FIELDOPS_CONFIG_DIR`: Override the config directory
//! - `FIELDOPS_DATA_DIR`: Override the data directory
//! - `FIELDOPS_CATALOG`: Path to a status catalog file

use std::path::PathBuf;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "FIELDOPS_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "FIELDOPS_CONFIG_DIR";

/// Environment variable for custom data directory.
pub const DATA_DIR_ENV: &str = "FIELDOPS_DATA_DIR";

/// Environment variable pointing at a status catalog file.
pub const CATALOG_ENV: &str = "FIELDOPS_CATALOG";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".fieldops";

const CONFIG_SUBDIR: &str = "config";
const DATA_SUBDIR: &str = "data";
const CATALOG_FILE: &str = "catalog.json";

/// Get the state directory.
///
/// Resolved from:
/// 1. `FIELDOPS_STATE_DIR` environment variable if set
/// 2. `~/.fieldops` if home directory is available
/// 3. `.fieldops` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the user config directory.
///
/// Defaults to `~/.fieldops/config/` or `FIELDOPS_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the data directory used by the file-backed store.
///
/// Defaults to `~/.fieldops/data/` or `FIELDOPS_DATA_DIR` env var.
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(DATA_SUBDIR))
}

/// Get the default catalog file path inside the config directory.
pub fn catalog_file() -> PathBuf {
    config_dir().join(CATALOG_FILE)
}

/// Get the catalog path named by `FIELDOPS_CATALOG`, if set.
pub fn catalog_env_path() -> Option<PathBuf> {
    std::env::var_os(CATALOG_ENV).map(PathBuf::from)
}

/// Get the .env.local file path.
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}
