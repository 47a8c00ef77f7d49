//! The kinds of work items tracked by the back office.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Kind of tracked work item.
///
/// Each kind owns a separate status catalog; codes never leak across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Parts requisition raised by a field technician.
    PartsRequest,
    /// Equipment order request.
    OrderRequest,
    /// Unit under bench test.
    UnitTest,
    /// Unit being stripped for salvage.
    StrippedUnit,
}

impl ItemType {
    /// All item types in declaration order.
    pub const ALL: [ItemType; 4] = [
        ItemType::PartsRequest,
        ItemType::OrderRequest,
        ItemType::UnitTest,
        ItemType::StrippedUnit,
    ];

    /// Returns the snake_case key used in configuration files and store paths.
    pub fn as_key(&self) -> &'static str {
        match self {
            ItemType::PartsRequest => "parts_request",
            ItemType::OrderRequest => "order_request",
            ItemType::UnitTest => "unit_test",
            ItemType::StrippedUnit => "stripped_unit",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemType::PartsRequest => "PartsRequest",
            ItemType::OrderRequest => "OrderRequest",
            ItemType::UnitTest => "UnitTest",
            ItemType::StrippedUnit => "StrippedUnit",
        };
        f.write_str(name)
    }
}

impl FromStr for ItemType {
    type Err = ParseError;

    /// Accepts `PartsRequest`, `parts_request`, `parts-request` and the
    /// short forms `parts`, `order`, `test`, `stripped`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match squashed.as_str() {
            "partsrequest" | "parts" => Ok(ItemType::PartsRequest),
            "orderrequest" | "order" => Ok(ItemType::OrderRequest),
            "unittest" | "test" => Ok(ItemType::UnitTest),
            "strippedunit" | "stripped" => Ok(ItemType::StrippedUnit),
            _ => Err(ParseError::UnknownItemType(s.to_string())),
        }
    }
}
