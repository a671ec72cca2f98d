//! Board glue: owns the engine pieces and drives the commit cycle.
//!
//! Control flow per gesture: renderer feeds `begin_drag`/`hover`; on
//! `end_drag(dropped=true)` the final snapshot goes through the resolver, the
//! resolved intent is applied to the partition atomically, and one
//! [`MoveCommitted`] is returned and published for the host's persistence
//! collaborator. The local commit is authoritative for rendering; server
//! reconciliation is the host's concern.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use partdesk_core::{BoardError, BoardResult, BucketKey, ItemId};
use partdesk_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::drag::{DragSession, HoverTarget};
use crate::partition::PartitionStore;
use crate::project::{Aggregate, BucketLimits, project};
use crate::registry::{Item, ItemRegistry};
use crate::resolve::{MoveIntent, resolve};

/// One record of the host's load payload: an entity fetched from the backend,
/// reduced to what the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub id: ItemId,
    pub weight: u64,
    pub bucket: BucketKey,
}

/// Event: a move was committed to the local partition.
///
/// Emitted exactly once per resolved non-no-op move, after the mutation has
/// applied. `from_bucket == to_bucket` for a reorder within one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCommitted {
    pub item: ItemId,
    pub from_bucket: BucketKey,
    pub to_bucket: BucketKey,
    pub occurred_at: DateTime<Utc>,
}

impl Event for MoveCommitted {
    fn event_type(&self) -> &'static str {
        "board.move.committed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// A partitioned drag-and-drop board.
///
/// Owned by the hosting component and passed down; never ambient global state.
/// Single logical writer: all mutations funnel through `end_drag`.
#[derive(Debug)]
pub struct Board {
    registry: ItemRegistry,
    partition: PartitionStore,
    session: DragSession,
    limits: BucketLimits,
    bus: InMemoryEventBus<MoveCommitted>,
}

impl Board {
    /// A board over the given buckets, in declared (render) order.
    pub fn new(buckets: impl IntoIterator<Item = BucketKey>) -> Self {
        Self {
            registry: ItemRegistry::new(),
            partition: PartitionStore::new(buckets),
            session: DragSession::new(),
            limits: BucketLimits::new(),
            bus: InMemoryEventBus::new(),
        }
    }

    /// Populate registry and partition from the host's fetch.
    ///
    /// Replaces the previous item set and placement; bucket configuration and
    /// limits are kept. All-or-nothing: on error the board is unchanged.
    pub fn load(&mut self, records: Vec<LoadRecord>) -> BoardResult<()> {
        let mut registry = ItemRegistry::new();
        registry.load(
            records
                .iter()
                .map(|r| Item::new(r.id, r.weight))
                .collect(),
        )?;

        let mut partition =
            PartitionStore::new(self.partition.buckets().map(|b| b.key().clone()));
        let mut orders: HashMap<BucketKey, Vec<ItemId>> = HashMap::new();
        for record in &records {
            if !partition.contains_bucket(&record.bucket) {
                return Err(BoardError::UnknownBucket(record.bucket.clone()));
            }
            orders.entry(record.bucket.clone()).or_default().push(record.id);
        }
        for (bucket, order) in orders {
            partition.assign(&registry, &bucket, order)?;
        }

        self.registry = registry;
        self.partition = partition;
        self.session = DragSession::new();
        debug!(items = self.registry.len(), "board loaded");
        Ok(())
    }

    /// Start a gesture on `item`.
    pub fn begin_drag(&mut self, item: ItemId) -> BoardResult<()> {
        let source = self
            .partition
            .bucket_of(&item)
            .cloned()
            .ok_or(BoardError::UnknownItem(item))?;
        self.session.begin(item, source)
    }

    /// Report the current hover target (renderer-resolved).
    pub fn hover(&mut self, target: HoverTarget) {
        self.session.hover(target);
    }

    /// Finish the gesture; resolve and commit on drop, discard on cancel.
    ///
    /// Returns the committed move, if any. The session is consumed either way;
    /// a resolver or store failure never re-enters the dragging state.
    pub fn end_drag(&mut self, dropped: bool) -> Option<MoveCommitted> {
        let snapshot = self.session.end(dropped)?;
        let from = snapshot.source.clone();
        let intent = resolve(&snapshot, &self.partition);
        let (item, to) = self.apply(intent)?;

        let committed = MoveCommitted {
            item,
            from_bucket: from,
            to_bucket: to,
            occurred_at: Utc::now(),
        };
        debug!(
            item = %committed.item,
            from = %committed.from_bucket,
            to = %committed.to_bucket,
            "move committed"
        );
        if self.bus.publish(committed.clone()).is_err() {
            error!("failed to publish committed move");
        }
        Some(committed)
    }

    /// Apply a resolved intent to the partition.
    ///
    /// Store errors here mean the resolver was fed ids that did not come from
    /// this partition — a programming error, asserted in debug and ignored
    /// (no mutation happened; validation precedes mutation) in release.
    fn apply(&mut self, intent: MoveIntent) -> Option<(ItemId, BucketKey)> {
        let (item, to, result) = match intent {
            MoveIntent::NoOp => return None,
            MoveIntent::MoveToEnd { item, to } => {
                let result = self.partition.move_to_end(item, &to);
                (item, to, result)
            }
            MoveIntent::ReorderWithin { bucket, item, before } => {
                let result = self.partition.reorder_within(&bucket, item, before);
                (item, bucket, result)
            }
            MoveIntent::MoveBefore { item, to, before } => {
                let result = self.partition.move_before(item, &to, before);
                (item, to, result)
            }
        };

        match result {
            Ok(()) => Some((item, to)),
            Err(err) => {
                debug_assert!(false, "resolved move failed to apply: {err}");
                error!(%err, "resolved move failed to apply; partition unchanged");
                None
            }
        }
    }

    /// Replace the configured limits without resetting the partition.
    pub fn set_limits(&mut self, limits: BucketLimits) {
        self.limits = limits;
    }

    /// Current per-bucket aggregates under the configured limits.
    pub fn aggregates(&self) -> HashMap<BucketKey, Aggregate> {
        project(&self.partition, &self.registry, &self.limits)
    }

    /// Subscribe to committed moves (host persistence collaborator).
    pub fn subscribe(&self) -> Subscription<MoveCommitted> {
        self.bus.subscribe()
    }

    pub fn partition(&self) -> &PartitionStore {
        &self.partition
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_dragging()
    }
}
