//! Error types for parsing model values from text.

use thiserror::Error;

/// Errors raised when text cannot be turned into a model value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The item type name is not one of the tracked kinds.
    #[error("unknown item type: {0}")]
    UnknownItemType(String),

    /// The bucket name is not one of the due-date buckets.
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),
}
