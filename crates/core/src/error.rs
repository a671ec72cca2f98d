//! Board error model.

use thiserror::Error;

use crate::id::{BucketKey, ItemId};

/// Result type used across the board engine.
pub type BoardResult<T> = Result<T, BoardError>;

/// Board-level error.
///
/// Every variant is a programmer-contract failure (stale ids, miswired gesture
/// events), not a user-facing one. Callers treat them as fatal in development
/// and log-and-ignore in production; no variant ever leaves the partition in a
/// partially mutated state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// An item id is not known to the registry / not in the expected bucket.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// A bucket key is not part of the configured partition.
    #[error("unknown bucket: {0}")]
    UnknownBucket(BucketKey),

    /// The partition cover invariant was violated (duplicate or missing id at
    /// load time).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// `reorder_within` was called for a bucket the item is not in.
    #[error("cross-bucket reorder: {item} is in {actual}, not {requested}")]
    CrossBucketReorder {
        item: ItemId,
        requested: BucketKey,
        actual: BucketKey,
    },

    /// `begin` was called while a drag session is already active.
    #[error("a drag session is already active")]
    AlreadyDragging,
}

impl BoardError {
    pub fn unknown_item(item: ItemId) -> Self {
        Self::UnknownItem(item)
    }

    pub fn unknown_bucket(key: impl Into<BucketKey>) -> Self {
        Self::UnknownBucket(key.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
