//! Field-ops core - shared configuration for all tracker interfaces.
//!
//! - **config**: Directory and file locations, environment overrides
//! - **catalog_config**: Status and legacy-key tables loaded from JSON

pub mod catalog_config;
pub mod config;
pub mod error;

pub use catalog_config::{CatalogConfig, CatalogSource, ItemTypeTable, StatusEntry};
pub use config::{catalog_env_path, catalog_file, config_dir, data_dir, env_file, state_dir};
pub use error::{ConfigError, Result};
