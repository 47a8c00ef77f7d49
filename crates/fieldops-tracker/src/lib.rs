//! Tracker service for field-ops work items.
//!
//! `Tracker` runs the lifecycle engine over a pluggable [`DataSource`]:
//! reads fetch a snapshot and aggregate it, writes re-read the item,
//! validate the transition and persist conditionally on the item's
//! `modified_on` stamp.
//!
//! Two sources ship with the crate:
//! - [`MemorySource`] keeps items in memory
//! - [`fieldops_persistence::WorkStore`] keeps one JSON file per item
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fieldops_lifecycle::{RawCriteria, StatusCatalog};
//! use fieldops_models::{ItemType, WorkItem};
//! use fieldops_tracker::{MemorySource, Tracker};
//!
//! # async fn example() -> fieldops_tracker::Result<()> {
//! let catalog = Arc::new(StatusCatalog::embedded()?);
//! let tracker = Tracker::new(catalog, MemorySource::new());
//!
//! let item = tracker
//!     .intake(WorkItem::new(ItemType::StrippedUnit, "Inp"))
//!     .await?;
//! tracker
//!     .update_status(ItemType::StrippedUnit, &item.id, "Com", "dana")
//!     .await?;
//!
//! let counts = tracker
//!     .status_counts(ItemType::StrippedUnit, &RawCriteria::new())
//!     .await?;
//! assert_eq!(counts.get(&"Com".to_string()), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod file_source;
pub mod source;
pub mod tracker;

pub use error::{Result, StoreError, StoreResult, TrackerError};
pub use source::{DataSource, MemorySource, StatusUpdate};
pub use tracker::{TrackedItem, Tracker, TrackingCalendar};
