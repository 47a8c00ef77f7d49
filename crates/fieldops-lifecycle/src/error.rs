//! Error types for lifecycle and filter operations.

use std::fmt;

use fieldops_core::ConfigError;
use fieldops_models::{ItemType, WorkItemId};
use thiserror::Error;

/// Why a requested status transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// Requested status is not in the item type's catalog.
    UnknownStatus,
    /// Current status is terminal.
    TerminalStatus,
    /// Requested status is not an allowed next status.
    NotAllowed,
}

impl fmt::Display for TransitionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransitionRejection::UnknownStatus => "requested status is not defined",
            TransitionRejection::TerminalStatus => "current status is terminal",
            TransitionRejection::NotAllowed => "transition is not allowed",
        };
        f.write_str(text)
    }
}

/// Errors raised by the status catalog, filter resolver and lifecycle validator.
///
/// Configuration variants are fatal and must not be retried; transition and
/// validation variants carry a message suitable for the end user.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The catalog has no table for the item type.
    #[error("configuration error: no status catalog for {0}")]
    UnknownItemType(ItemType),

    /// The legacy key is not in the item type's key table.
    #[error("configuration error: unknown legacy key {key} for {item_type}")]
    UnknownLegacyKey { item_type: ItemType, key: i64 },

    /// A stored item carries a status the catalog does not define.
    #[error("configuration error: status {code} is not defined for {item_type}")]
    UndefinedStatus { item_type: ItemType, code: String },

    /// Catalog configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Requested status transition was refused.
    #[error("cannot move {item_type} {id} from {from} to {to}: {reason}")]
    InvalidTransition {
        item_type: ItemType,
        id: WorkItemId,
        from: String,
        to: String,
        reason: TransitionRejection,
    },

    /// Filter or request input is malformed.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl LifecycleError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for configuration errors, which are never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LifecycleError::UnknownItemType(_)
                | LifecycleError::UnknownLegacyKey { .. }
                | LifecycleError::UndefinedStatus { .. }
                | LifecycleError::Config(_)
        )
    }
}

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
