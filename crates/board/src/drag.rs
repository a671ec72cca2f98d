//! Drag session: the transient state of one in-progress move gesture.

use tracing::warn;

use partdesk_core::{BoardError, BoardResult, BucketKey, ItemId};

/// What the pointer is currently over, as resolved by the renderer.
///
/// Collision/centroid detection is a UI-layer concern; by the time a target
/// reaches the engine it is already unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    /// No valid drop target under the pointer.
    None,
    /// The empty area of a bucket.
    Bucket(BucketKey),
    /// A specific item card.
    Item(ItemId),
}

/// The captured state of one gesture: the item being dragged, the bucket it
/// started in, and the last reported hover target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSnapshot {
    pub item: ItemId,
    pub source: BucketKey,
    pub hover: HoverTarget,
}

/// State machine for one drag gesture: `Idle -> Dragging -> Idle`.
///
/// Created fresh per gesture and never persisted. Both drop and cancel return
/// to `Idle`; only a drop hands the snapshot on for resolution.
#[derive(Debug, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging(DragSnapshot),
}

impl DragSession {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Start a gesture on `item`, capturing its source bucket.
    ///
    /// Fails with `AlreadyDragging` while a gesture is active; the active
    /// session is left untouched.
    pub fn begin(&mut self, item: ItemId, source: BucketKey) -> BoardResult<()> {
        if self.is_dragging() {
            return Err(BoardError::AlreadyDragging);
        }
        *self = Self::Dragging(DragSnapshot {
            item,
            source,
            hover: HoverTarget::None,
        });
        Ok(())
    }

    /// Update the hover target. Valid any number of times while dragging;
    /// never touches the partition.
    ///
    /// A hover outside a gesture is a renderer wiring bug: logged and ignored.
    pub fn hover(&mut self, target: HoverTarget) {
        match self {
            Self::Dragging(snapshot) => snapshot.hover = target,
            Self::Idle => warn!("hover event outside an active drag session"),
        }
    }

    /// Finish the gesture.
    ///
    /// Returns the final snapshot when `dropped` is true and a gesture was
    /// active; `None` on cancel. Either way the session is back to `Idle`.
    pub fn end(&mut self, dropped: bool) -> Option<DragSnapshot> {
        match std::mem::take(self) {
            Self::Dragging(snapshot) if dropped => Some(snapshot),
            _ => None,
        }
    }
}
