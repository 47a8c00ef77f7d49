//! Type-safe ID wrappers for work items.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtypes with common functionality.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Creates an ID from an existing string (legacy row keys, tests).
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(WorkItemId, "wi");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_id_prefix() {
        let id = WorkItemId::new();
        assert!(id.as_str().starts_with("wi-"));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(WorkItemId::new(), WorkItemId::new());
    }

    #[test]
    fn test_legacy_row_index_as_id() {
        let id = WorkItemId::from_string("1042");
        assert_eq!(id.as_str(), "1042");
        assert_eq!(format!("{}", id), "1042");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = WorkItemId::from_string("wi-test");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"wi-test\"");

        let parsed: WorkItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
