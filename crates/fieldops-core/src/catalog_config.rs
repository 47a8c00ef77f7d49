//! Status catalog configuration.
//!
//! Status tables and legacy-key tables are data, loaded from JSON. The
//! lookup order is:
//!
//! 1. An explicit path passed by the caller
//! 2. The `FIELDOPS_CATALOG` environment variable
//! 3. `<config_dir>/catalog.json` if it exists
//! 4. The catalog embedded in this crate
//!
//! ```json
//! {
//!   "wildcard_tokens": ["All", "%"],
//!   "item_types": {
//!     "stripped_unit": {
//!       "statuses": [
//!         { "code": "Inp", "label": "In Progress", "next": ["Com"] },
//!         { "code": "Com", "label": "Complete", "terminal": true }
//!       ],
//!       "legacy_keys": { "0": "All", "1": "Inp", "3": "Com" }
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use fieldops_models::{normalize, same_text, ItemType, StatusDefinition};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config;
use crate::error::{ConfigError, Result};

const EMBEDDED_CATALOG: &str = include_str!("../catalog.json");

fn default_wildcard_tokens() -> Vec<String> {
    vec!["All".to_string(), "%".to_string()]
}

/// One status entry in a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub next: Vec<String>,
}

/// Catalog table for a single item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeTable {
    /// Statuses in display order.
    pub statuses: Vec<StatusEntry>,

    /// Legacy numeric key to status code (or wildcard token).
    #[serde(default)]
    pub legacy_keys: BTreeMap<i64, String>,
}

impl ItemTypeTable {
    /// Converts the entries into status definitions for `item_type`.
    pub fn definitions(&self, item_type: ItemType) -> Vec<StatusDefinition> {
        self.statuses
            .iter()
            .map(|entry| {
                let def = StatusDefinition::new(item_type, entry.code.trim(), entry.label.as_str())
                    .with_next(entry.next.iter().map(|s| s.trim().to_string()));
                if entry.terminal {
                    def.terminal()
                } else {
                    def
                }
            })
            .collect()
    }
}

/// Where a loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Read from a file on disk.
    File(PathBuf),
    /// The catalog compiled into this crate.
    Embedded,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Embedded => f.write_str("embedded catalog"),
        }
    }
}

/// Full catalog configuration: every item type's table plus wildcard tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Filter values meaning "no constraint on this dimension".
    #[serde(default = "default_wildcard_tokens")]
    pub wildcard_tokens: Vec<String>,

    /// Tables keyed by item type key (`parts_request`, `stripped_unit`, ...).
    #[serde(default)]
    pub item_types: BTreeMap<String, ItemTypeTable>,
}

impl CatalogConfig {
    /// Parses and validates a catalog from JSON text.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let config: CatalogConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data, &path.display().to_string())
    }

    /// Returns the catalog compiled into this crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG, "embedded catalog")
    }

    /// Resolves the catalog using the documented lookup order.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, CatalogSource)> {
        let candidate = explicit
            .map(Path::to_path_buf)
            .or_else(config::catalog_env_path);

        if let Some(path) = candidate {
            debug!(path = %path.display(), "Loading status catalog");
            return Ok((Self::load(&path)?, CatalogSource::File(path)));
        }

        let default_path = config::catalog_file();
        if default_path.exists() {
            debug!(path = %default_path.display(), "Loading status catalog");
            return Ok((Self::load(&default_path)?, CatalogSource::File(default_path)));
        }

        debug!("Using embedded status catalog");
        Ok((Self::embedded()?, CatalogSource::Embedded))
    }

    /// Returns true if `value` is one of the wildcard tokens.
    pub fn is_wildcard(&self, value: &str) -> bool {
        self.wildcard_tokens.iter().any(|token| same_text(token, value))
    }

    /// Iterates the configured tables with their parsed item types.
    ///
    /// Keys were checked by [`CatalogConfig::validate`], so unknown keys
    /// never reach callers of a loaded config.
    pub fn tables(&self) -> impl Iterator<Item = (ItemType, &ItemTypeTable)> {
        self.item_types
            .iter()
            .filter_map(|(key, table)| key.parse::<ItemType>().ok().map(|t| (t, table)))
    }

    /// Checks internal consistency of every table.
    pub fn validate(&self) -> Result<()> {
        if self.wildcard_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                item_type: "*".to_string(),
                reason: "wildcard tokens must not be blank".to_string(),
            });
        }

        for (key, table) in &self.item_types {
            let item_type: ItemType = key
                .parse()
                .map_err(|_| ConfigError::UnknownItemType(key.clone()))?;
            self.validate_table(item_type, table)?;
        }
        Ok(())
    }

    fn validate_table(&self, item_type: ItemType, table: &ItemTypeTable) -> Result<()> {
        let invalid = |reason: String| ConfigError::Invalid {
            item_type: item_type.to_string(),
            reason,
        };

        if table.statuses.is_empty() {
            return Err(invalid("no statuses defined".to_string()));
        }

        let mut codes = HashSet::new();
        for entry in &table.statuses {
            if entry.code.trim().is_empty() {
                return Err(invalid("blank status code".to_string()));
            }
            if self.is_wildcard(&entry.code) {
                return Err(invalid(format!(
                    "status code {} collides with a wildcard token",
                    entry.code
                )));
            }
            if !codes.insert(normalize(&entry.code)) {
                return Err(invalid(format!("duplicate status code {}", entry.code)));
            }
        }

        for entry in &table.statuses {
            if entry.terminal && !entry.next.is_empty() {
                return Err(invalid(format!(
                    "terminal status {} lists next statuses",
                    entry.code
                )));
            }
            if let Some(unknown) = entry.next.iter().find(|n| !codes.contains(&normalize(n))) {
                return Err(invalid(format!(
                    "status {} allows unknown next status {}",
                    entry.code, unknown
                )));
            }
        }

        for (key, code) in &table.legacy_keys {
            if !self.is_wildcard(code) && !codes.contains(&normalize(code)) {
                return Err(invalid(format!(
                    "legacy key {} maps to unknown status {}",
                    key, code
                )));
            }
        }

        Ok(())
    }
}
