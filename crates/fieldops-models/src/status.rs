//! Status definitions and the shared status-text normalization policy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::item_type::ItemType;

/// Normalizes free text for comparison: trimmed and uppercased.
///
/// Every status, make, model and assignee comparison in the tracker goes
/// through this one function.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Returns true if both values are equal under [`normalize`].
pub fn same_text(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// One valid status within an item type's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDefinition {
    /// Item type this status belongs to.
    pub item_type: ItemType,

    /// Canonical status code, e.g. `Submitted` or `Inp`.
    pub code: String,

    /// Human-readable label.
    pub label: String,

    /// Whether the status is final. Terminal statuses accept no transitions.
    #[serde(default)]
    pub terminal: bool,

    /// Codes this status may move to.
    #[serde(default)]
    pub allowed_next: BTreeSet<String>,
}

impl StatusDefinition {
    /// Creates a non-terminal status with no outgoing transitions.
    pub fn new(item_type: ItemType, code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            item_type,
            code: code.into(),
            label: label.into(),
            terminal: false,
            allowed_next: BTreeSet::new(),
        }
    }

    /// Marks the status terminal.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Adds allowed next codes.
    pub fn with_next<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_next.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Returns true if `code` names this status under the normalization policy.
    pub fn is(&self, code: &str) -> bool {
        same_text(&self.code, code)
    }

    /// Returns true if `code` is listed as an allowed next status.
    pub fn allows(&self, code: &str) -> bool {
        self.allowed_next.iter().any(|next| same_text(next, code))
    }
}
