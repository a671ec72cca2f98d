//! Aggregate projector: derived per-bucket summaries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use partdesk_core::BucketKey;

use crate::partition::PartitionStore;
use crate::registry::ItemRegistry;

/// Ceilings on per-bucket aggregate weight, host-supplied (e.g. a platform's
/// max stock rows). A missing or zero entry means unlimited.
pub type BucketLimits = HashMap<BucketKey, u64>;

/// Derived per-bucket summary. Recomputed from the partition on every change,
/// never stored authoritatively.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub item_count: usize,
    pub weight_sum: u64,
    pub is_over_limit: bool,
}

/// Project the partition into per-bucket aggregates.
///
/// Pure and side-effect-free; cost is proportional to the total item count,
/// which at the expected scale (hundreds of items) makes incremental tracking
/// unnecessary. Ids missing from the registry cannot occur while the cover
/// invariant holds and count as weight zero.
pub fn project(
    partition: &PartitionStore,
    registry: &ItemRegistry,
    limits: &BucketLimits,
) -> HashMap<BucketKey, Aggregate> {
    let mut aggregates = HashMap::new();

    for bucket in partition.buckets() {
        let weight_sum = bucket
            .order()
            .iter()
            .map(|id| {
                let weight = registry.weight_of(id);
                debug_assert!(weight.is_some(), "{id} is assigned but not registered");
                weight.unwrap_or(0)
            })
            .sum::<u64>();

        let limit = limits.get(bucket.key()).copied().unwrap_or(0);

        aggregates.insert(
            bucket.key().clone(),
            Aggregate {
                item_count: bucket.len(),
                weight_sum,
                is_over_limit: limit > 0 && weight_sum > limit,
            },
        );
    }

    aggregates
}
