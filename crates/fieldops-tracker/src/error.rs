//! Error types for the tracker service.

use chrono::{DateTime, Utc};
use fieldops_lifecycle::LifecycleError;
use fieldops_models::{ItemType, WorkItemId};
use fieldops_persistence::PersistenceError;
use thiserror::Error;

/// Errors reported by a data source.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Item does not exist.
    #[error("not found")]
    NotFound,

    /// Item changed since it was fetched.
    #[error("modified concurrently (expected stamp {expected:?}, found {actual:?})")]
    Conflict {
        expected: Option<DateTime<Utc>>,
        actual: Option<DateTime<Utc>>,
    },

    /// Item with the same id already exists.
    #[error("already exists")]
    Duplicate,

    /// File-backed store failure.
    #[error(transparent)]
    Persistence(PersistenceError),

    /// Any other backend failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { .. } => StoreError::NotFound,
            PersistenceError::Conflict {
                expected, actual, ..
            } => StoreError::Conflict { expected, actual },
            PersistenceError::AlreadyExists { .. } => StoreError::Duplicate,
            other => StoreError::Persistence(other),
        }
    }
}

/// Result type for data source operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Tracker service errors.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Catalog, filter or transition error.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Snapshot fetch failed.
    #[error("failed to fetch {item_type} items: {source}")]
    Fetch {
        item_type: ItemType,
        #[source]
        source: StoreError,
    },

    /// Single-item read or write failed.
    #[error("store rejected {item_type} {id} ({attempted}): {source}")]
    Store {
        item_type: ItemType,
        id: WorkItemId,
        attempted: String,
        #[source]
        source: StoreError,
    },

    /// No item with this id exists for the item type.
    #[error("{item_type} {id} not found")]
    NotFound { item_type: ItemType, id: WorkItemId },
}

impl TrackerError {
    /// Returns true for a lost-update conflict the caller may retry after refetching.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            TrackerError::Store {
                source: StoreError::Conflict { .. },
                ..
            }
        )
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
