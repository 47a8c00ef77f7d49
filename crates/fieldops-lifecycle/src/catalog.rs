//! StatusCatalog - per-item-type status tables.
//!
//! Each item type carries its own ordered status list, terminal flags,
//! allowed transitions and legacy numeric key table. Tables come from
//! [`CatalogConfig`]; nothing here hard-codes a status or a key.

use std::collections::{BTreeMap, HashMap};

use fieldops_core::CatalogConfig;
use fieldops_models::{same_text, ItemType, StatusDefinition};

use crate::error::{LifecycleError, Result};

#[derive(Debug, Clone)]
struct StatusTable {
    statuses: Vec<StatusDefinition>,
    legacy_keys: BTreeMap<i64, String>,
}

impl StatusTable {
    fn find(&self, code: &str) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| s.is(code))
    }
}

/// Read-only catalog of valid statuses for every configured item type.
#[derive(Debug, Clone)]
pub struct StatusCatalog {
    tables: HashMap<ItemType, StatusTable>,
    wildcard_tokens: Vec<String>,
}

impl StatusCatalog {
    /// Builds a catalog from validated configuration.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;

        let tables = config
            .tables()
            .map(|(item_type, table)| {
                (
                    item_type,
                    StatusTable {
                        statuses: table.definitions(item_type),
                        legacy_keys: table
                            .legacy_keys
                            .iter()
                            .map(|(k, v)| (*k, v.trim().to_string()))
                            .collect(),
                    },
                )
            })
            .collect();

        Ok(Self {
            tables,
            wildcard_tokens: config.wildcard_tokens.clone(),
        })
    }

    /// Builds a catalog from the configuration embedded in `fieldops-core`.
    pub fn embedded() -> Result<Self> {
        Self::from_config(&CatalogConfig::embedded()?)
    }

    fn table(&self, item_type: ItemType) -> Result<&StatusTable> {
        self.tables
            .get(&item_type)
            .ok_or(LifecycleError::UnknownItemType(item_type))
    }

    /// Item types with a configured table, in declaration order.
    pub fn item_types(&self) -> Vec<ItemType> {
        ItemType::ALL
            .into_iter()
            .filter(|t| self.tables.contains_key(t))
            .collect()
    }

    /// Returns the ordered status list for an item type.
    pub fn lookup(&self, item_type: ItemType) -> Result<&[StatusDefinition]> {
        Ok(&self.table(item_type)?.statuses)
    }

    /// Finds a status definition by code, compared trimmed and case-insensitively.
    pub fn definition(&self, item_type: ItemType, code: &str) -> Result<Option<&StatusDefinition>> {
        Ok(self.table(item_type)?.find(code))
    }

    /// Returns the catalog spelling of `code`, if it is defined.
    pub fn canonical_code(&self, item_type: ItemType, code: &str) -> Result<Option<&str>> {
        Ok(self.definition(item_type, code)?.map(|d| d.code.as_str()))
    }

    /// Returns true if `code` is defined and terminal.
    pub fn is_terminal(&self, item_type: ItemType, code: &str) -> Result<bool> {
        Ok(self.definition(item_type, code)?.is_some_and(|d| d.terminal))
    }

    /// Checks whether `from -> to` is a permitted transition.
    ///
    /// Staying in the same status is always valid. Otherwise both codes must
    /// be defined, `from` must not be terminal, and `to` must be listed as an
    /// allowed next status of `from`.
    pub fn is_valid_transition(&self, item_type: ItemType, from: &str, to: &str) -> bool {
        if same_text(from, to) {
            return true;
        }

        let Ok(table) = self.table(item_type) else {
            return false;
        };

        match (table.find(from), table.find(to)) {
            (Some(current), Some(_)) => !current.terminal && current.allows(to),
            _ => false,
        }
    }

    /// Maps a legacy numeric key to its status code (or wildcard token).
    pub fn code_from_legacy_key(&self, item_type: ItemType, key: i64) -> Result<&str> {
        self.table(item_type)?
            .legacy_keys
            .get(&key)
            .map(String::as_str)
            .ok_or(LifecycleError::UnknownLegacyKey { item_type, key })
    }

    /// Returns the legacy key table for an item type.
    pub fn legacy_keys(&self, item_type: ItemType) -> Result<&BTreeMap<i64, String>> {
        Ok(&self.table(item_type)?.legacy_keys)
    }

    /// Returns true if `value` is a wildcard token ("All", "%").
    pub fn is_wildcard(&self, value: &str) -> bool {
        self.wildcard_tokens.iter().any(|t| same_text(t, value))
    }
}
