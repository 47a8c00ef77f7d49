//! Core data models for the field-ops tracker.
//!
//! This crate provides the plain record types shared by every other crate:
//! work items, item types, status definitions and due-date buckets.

pub mod bucket;
pub mod error;
pub mod ids;
pub mod item_type;
pub mod status;
pub mod work;

// Re-export main types
pub use bucket::Bucket;
pub use error::ParseError;
pub use ids::WorkItemId;
pub use item_type::ItemType;
pub use status::{normalize, same_text, StatusDefinition};
pub use work::WorkItem;
