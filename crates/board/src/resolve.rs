//! Move resolver: pure translation of a finished gesture into a move intent.

use tracing::error;

use partdesk_core::{BucketKey, ItemId};

use crate::drag::{DragSnapshot, HoverTarget};
use crate::partition::PartitionStore;

/// The concrete partition mutation a finished gesture resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveIntent {
    /// Nothing to do (no target, own-bucket empty area, self-hover).
    NoOp,
    /// Append `item` to the end of `to` (drop on another bucket's empty area).
    MoveToEnd { item: ItemId, to: BucketKey },
    /// Reinsert `item` immediately before `before` within its own bucket.
    ReorderWithin {
        bucket: BucketKey,
        item: ItemId,
        before: ItemId,
    },
    /// Cross-bucket insert: move `item` into `to`, immediately before
    /// `before`, as one atomic step.
    MoveBefore {
        item: ItemId,
        to: BucketKey,
        before: ItemId,
    },
}

impl MoveIntent {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Resolve the final state of a drag gesture against the current partition.
///
/// Pure: reads the partition, never mutates it. Every well-formed
/// `(snapshot, partition)` pair resolves deterministically. Ids the session
/// hands us are supposed to have come from this partition, so an unknown hover
/// target is a host wiring bug: asserted in debug builds, resolved to `NoOp`
/// (never a partial move) in release.
pub fn resolve(snapshot: &DragSnapshot, partition: &PartitionStore) -> MoveIntent {
    match &snapshot.hover {
        HoverTarget::None => MoveIntent::NoOp,

        HoverTarget::Bucket(target) => {
            if !partition.contains_bucket(target) {
                debug_assert!(false, "hover target bucket {target} is not in the partition");
                error!(bucket = %target, "drop on unknown bucket ignored");
                return MoveIntent::NoOp;
            }
            if *target == snapshot.source {
                // Dropping back on your own bucket's empty area preserves
                // position; it is not a move-to-end.
                MoveIntent::NoOp
            } else {
                MoveIntent::MoveToEnd {
                    item: snapshot.item,
                    to: target.clone(),
                }
            }
        }

        HoverTarget::Item(target) => {
            if *target == snapshot.item {
                return MoveIntent::NoOp;
            }
            let Some(target_bucket) = partition.bucket_of(target) else {
                debug_assert!(false, "hover target item {target} is not in the partition");
                error!(item = %target, "drop on unknown item ignored");
                return MoveIntent::NoOp;
            };
            if *target_bucket == snapshot.source {
                MoveIntent::ReorderWithin {
                    bucket: snapshot.source.clone(),
                    item: snapshot.item,
                    before: *target,
                }
            } else {
                MoveIntent::MoveBefore {
                    item: snapshot.item,
                    to: target_bucket.clone(),
                    before: *target,
                }
            }
        }
    }
}
