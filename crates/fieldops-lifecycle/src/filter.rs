//! FilterResolver - turns raw filter input into a work item predicate.
//!
//! Raw input is a list of `(dimension, value)` pairs as they arrive from a
//! query string or CLI flag. Resolution rules:
//!
//! - Absent or blank values, and wildcard tokens ("All", "%"), put no
//!   constraint on their dimension. Wildcards are never partial matches.
//! - A legacy numeric `key` is mapped through the item type's key table and,
//!   when present, takes precedence over an explicit `status`.
//! - Remaining dimensions are compared trimmed and case-insensitively and
//!   combined with AND.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use fieldops_models::{normalize, same_text, ItemType, WorkItem};
use tracing::debug;

use crate::catalog::StatusCatalog;
use crate::error::{LifecycleError, Result};
use crate::field::Field;

/// A dimension accepted in raw filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// Compare against a work item field.
    Field(Field),
    /// Legacy numeric status key.
    LegacyKey,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Field(field) => write!(f, "{}", field),
            Dimension::LegacyKey => f.write_str("key"),
        }
    }
}

impl FromStr for Dimension {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "key" | "legacy_key" | "status_key" => Ok(Dimension::LegacyKey),
            _ => s.parse().map(Dimension::Field),
        }
    }
}

/// Unresolved filter input.
#[derive(Debug, Clone, Default)]
pub struct RawCriteria {
    values: Vec<(String, Option<String>)>,
    include_archived: bool,
}

impl RawCriteria {
    /// Creates empty criteria (matches every active item).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dimension with a value.
    pub fn with(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((dimension.into(), Some(value.into())));
        self
    }

    /// Adds a dimension with a possibly absent value.
    pub fn with_optional(mut self, dimension: impl Into<String>, value: Option<String>) -> Self {
        self.values.push((dimension.into(), value));
        self
    }

    /// Includes archived items.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Returns the raw pairs in input order.
    pub fn values(&self) -> &[(String, Option<String>)] {
        &self.values
    }
}

/// A resolved filter: an item type plus AND-ed equality clauses.
///
/// Clause values are already normalized (trimmed and uppercased).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    item_type: ItemType,
    clauses: BTreeMap<Field, String>,
    include_archived: bool,
}

impl FilterSpec {
    /// Creates a filter matching every active item of `item_type`.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            clauses: BTreeMap::new(),
            include_archived: false,
        }
    }

    /// Adds an equality clause.
    pub fn with_clause(mut self, field: Field, value: &str) -> Self {
        self.clauses.insert(field, normalize(value));
        self
    }

    /// Includes archived items.
    pub fn with_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Clauses in dimension order.
    pub fn clauses(&self) -> &BTreeMap<Field, String> {
        &self.clauses
    }

    /// Returns the normalized value required for `field`, if constrained.
    pub fn clause(&self, field: Field) -> Option<&str> {
        self.clauses.get(&field).map(String::as_str)
    }

    /// Returns true if the work item matches this filter.
    pub fn matches(&self, item: &WorkItem) -> bool {
        if item.item_type != self.item_type {
            return false;
        }

        if item.archived && !self.include_archived {
            return false;
        }

        self.clauses.iter().all(|(field, expected)| {
            field
                .value_of(item)
                .is_some_and(|actual| same_text(actual, expected))
        })
    }

    /// Returns the filter as a plain predicate.
    pub fn predicate(&self) -> impl Fn(&WorkItem) -> bool + '_ {
        move |item| self.matches(item)
    }

    /// Keeps only matching items from a snapshot.
    pub fn apply(&self, items: Vec<WorkItem>) -> Vec<WorkItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

/// Resolves raw criteria against a status catalog.
pub struct FilterResolver<'a> {
    catalog: &'a StatusCatalog,
}

impl<'a> FilterResolver<'a> {
    pub fn new(catalog: &'a StatusCatalog) -> Self {
        Self { catalog }
    }

    /// Resolves raw criteria into a [`FilterSpec`].
    ///
    /// # Errors
    ///
    /// - Configuration error if the item type or a legacy key is unknown
    /// - Validation error for an unknown dimension, a repeated dimension,
    ///   a non-numeric key, or a status the catalog does not define
    pub fn resolve(&self, item_type: ItemType, raw: &RawCriteria) -> Result<FilterSpec> {
        self.catalog.lookup(item_type)?;

        let mut supplied: BTreeMap<Dimension, Option<&str>> = BTreeMap::new();
        for (name, value) in &raw.values {
            let dimension: Dimension = name.parse()?;
            if supplied.insert(dimension, value.as_deref()).is_some() {
                return Err(LifecycleError::validation(
                    dimension.to_string(),
                    "supplied more than once",
                ));
            }
        }

        let mut spec = FilterSpec::new(item_type).with_archived(raw.include_archived);
        let mut key_resolved = false;

        if let Some(raw_key) = supplied
            .remove(&Dimension::LegacyKey)
            .flatten()
            .and_then(|v| self.constraint(v))
        {
            let key: i64 = raw_key.parse().map_err(|_| {
                LifecycleError::validation("key", format!("'{}' is not a number", raw_key))
            })?;
            let code = self.catalog.code_from_legacy_key(item_type, key)?;
            if !self.catalog.is_wildcard(code) {
                spec = spec.with_clause(Field::Status, code);
            }
            key_resolved = true;
        }

        for (dimension, value) in supplied {
            let Dimension::Field(field) = dimension else {
                continue;
            };
            let Some(value) = value.and_then(|v| self.constraint(v)) else {
                continue;
            };

            if field == Field::Status {
                if key_resolved {
                    debug!(item_type = %item_type, status = %value, "Legacy key overrides explicit status");
                    continue;
                }
                let code = self
                    .catalog
                    .canonical_code(item_type, value)?
                    .ok_or_else(|| {
                        LifecycleError::validation(
                            "status",
                            format!("'{}' is not a {} status", value, item_type),
                        )
                    })?;
                spec = spec.with_clause(Field::Status, code);
            } else {
                spec = spec.with_clause(field, value);
            }
        }

        debug!(
            item_type = %item_type,
            clauses = spec.clauses.len(),
            include_archived = spec.include_archived,
            "Resolved filter"
        );

        Ok(spec)
    }

    /// Returns the trimmed value if it constrains its dimension.
    fn constraint<'v>(&self, value: &'v str) -> Option<&'v str> {
        let trimmed = value.trim();
        if trimmed.is_empty() || self.catalog.is_wildcard(trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }
}
