//! Persistence layer for the field-ops tracker.
//!
//! Provides a file-backed work item store using atomic file operations
//! (write to temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use fieldops_persistence::WorkStore;
//! use fieldops_models::{ItemType, WorkItem};
//!
//! let store = WorkStore::new("/home/user/.fieldops/data");
//!
//! let item = WorkItem::new(ItemType::StrippedUnit, "Inp").with_make("Deere");
//! store.save_work(&item).unwrap();
//!
//! let loaded = store.load_work(ItemType::StrippedUnit, &item.id).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod work_store;

pub use error::{PersistenceError, Result};
pub use work_store::WorkStore;
