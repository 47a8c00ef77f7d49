//! Work-item lifecycle and aggregation engine.
//!
//! This crate holds the decision logic shared by every tracked item type:
//! - `StatusCatalog`: per-item-type statuses, transitions and legacy keys
//! - `FilterResolver`: raw filter input to a `FilterSpec` predicate
//! - `LifecycleValidator`: transition checks over a catalog
//! - `due`: due-date buckets and the tracking-calendar window
//! - `report`: counts and distinct-value lists
//!
//! Everything here is pure and synchronous; callers fetch a snapshot first.
//!
//! # Example
//!
//! ```no_run
//! use fieldops_lifecycle::{FilterResolver, LifecycleValidator, RawCriteria, StatusCatalog};
//! use fieldops_models::{ItemType, WorkItem};
//!
//! let catalog = StatusCatalog::embedded().unwrap();
//!
//! let spec = FilterResolver::new(&catalog)
//!     .resolve(ItemType::PartsRequest, &RawCriteria::new().with("key", "2"))
//!     .unwrap();
//!
//! let item = WorkItem::new(ItemType::PartsRequest, "Submitted");
//! assert!(spec.matches(&item));
//!
//! let shipped = LifecycleValidator::new(&catalog)
//!     .apply_transition(&item, "Shipped", "dana")
//!     .unwrap();
//! assert_eq!(shipped.status_code, "Shipped");
//! ```

pub mod catalog;
pub mod due;
pub mod error;
pub mod field;
pub mod filter;
pub mod lifecycle;
pub mod report;

pub use catalog::StatusCatalog;
pub use due::{bucket_of, days_until, legacy_window, tracking_bucket, LegacyWindow};
pub use error::{LifecycleError, Result, TransitionRejection};
pub use field::Field;
pub use filter::{Dimension, FilterResolver, FilterSpec, RawCriteria};
pub use lifecycle::LifecycleValidator;
pub use report::{bucket_counts, count_by, distinct_values, BucketCounts, CountEntry, Counts};
