//! Partition store: every item in exactly one bucket, ordered within it.

use std::collections::HashMap;

use tracing::warn;

use partdesk_core::{BoardError, BoardResult, BucketKey, ItemId};

use crate::registry::ItemRegistry;

/// A named, ordered container holding a disjoint subset of the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    key: BucketKey,
    order: Vec<ItemId>,
}

impl Bucket {
    fn new(key: BucketKey) -> Self {
        Self {
            key,
            order: Vec::new(),
        }
    }

    pub fn key(&self) -> &BucketKey {
        &self.key
    }

    /// Item ids in display order.
    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The full mapping from bucket key to ordered membership.
///
/// Invariant (total, disjoint cover): every assigned item id appears in the
/// order of exactly one bucket, exactly once — including mid-mutation, which is
/// why every mutating operation validates completely before touching state.
///
/// Buckets are fixed at construction; the declared order is preserved so
/// renderers can lay lanes out without re-sorting.
#[derive(Debug, Clone)]
pub struct PartitionStore {
    buckets: Vec<Bucket>,
    index: HashMap<BucketKey, usize>,
    /// Reverse index for O(1) `bucket_of` lookups.
    locations: HashMap<ItemId, BucketKey>,
}

impl PartitionStore {
    /// Build an empty partition over the given bucket keys.
    ///
    /// Duplicate keys are collapsed (first occurrence wins) with a warning;
    /// the host declaring its lanes twice is a wiring bug, not a reason to
    /// refuse to render.
    pub fn new(keys: impl IntoIterator<Item = BucketKey>) -> Self {
        let mut buckets: Vec<Bucket> = Vec::new();
        let mut index = HashMap::new();

        for key in keys {
            if index.contains_key(&key) {
                warn!(bucket = %key, "duplicate bucket key ignored");
                continue;
            }
            index.insert(key.clone(), buckets.len());
            buckets.push(Bucket::new(key));
        }

        Self {
            buckets,
            index,
            locations: HashMap::new(),
        }
    }

    /// Bulk initializer: place `order` into `bucket` at load time.
    ///
    /// Fails with `InvariantViolation` if an id is unknown to the registry,
    /// already placed in another bucket, or repeated within `order`. On any
    /// failure the store is left unchanged.
    pub fn assign(
        &mut self,
        registry: &ItemRegistry,
        bucket: &BucketKey,
        order: Vec<ItemId>,
    ) -> BoardResult<()> {
        let idx = self.bucket_index(bucket)?;

        let mut seen = HashMap::with_capacity(order.len());
        for id in &order {
            if !registry.contains(id) {
                return Err(BoardError::invariant(format!(
                    "assign to {bucket}: {id} is not in the registry"
                )));
            }
            if let Some(elsewhere) = self.locations.get(id) {
                if elsewhere != bucket {
                    return Err(BoardError::invariant(format!(
                        "assign to {bucket}: {id} is already in {elsewhere}"
                    )));
                }
            }
            if seen.insert(*id, ()).is_some() {
                return Err(BoardError::invariant(format!(
                    "assign to {bucket}: {id} appears twice"
                )));
            }
        }

        // Re-assigning a bucket releases its previous membership first.
        for id in &self.buckets[idx].order {
            self.locations.remove(id);
        }
        for id in &order {
            self.locations.insert(*id, bucket.clone());
        }
        self.buckets[idx].order = order;
        Ok(())
    }

    /// Remove `item` from its current bucket and append it to `target`.
    ///
    /// A valid no-op when the item is already last in `target`.
    pub fn move_to_end(&mut self, item: ItemId, target: &BucketKey) -> BoardResult<()> {
        let source = self
            .locations
            .get(&item)
            .cloned()
            .ok_or(BoardError::UnknownItem(item))?;
        let target_idx = self.bucket_index(target)?;
        let source_idx = self.bucket_index(&source)?;

        Self::remove_from(&mut self.buckets[source_idx].order, &item);
        self.buckets[target_idx].order.push(item);
        self.locations.insert(item, target.clone());
        Ok(())
    }

    /// Reinsert `item` immediately before `before` within `bucket`.
    ///
    /// `item` hovering itself degenerates to a no-op at the resolver, so
    /// `item == before` never reaches the store in normal operation; it is
    /// treated as a valid no-op here regardless.
    pub fn reorder_within(
        &mut self,
        bucket: &BucketKey,
        item: ItemId,
        before: ItemId,
    ) -> BoardResult<()> {
        let idx = self.bucket_index(bucket)?;
        let actual = self
            .locations
            .get(&item)
            .cloned()
            .ok_or(BoardError::UnknownItem(item))?;
        if actual != *bucket {
            return Err(BoardError::CrossBucketReorder {
                item,
                requested: bucket.clone(),
                actual,
            });
        }
        if !self.buckets[idx].order.contains(&before) {
            return Err(BoardError::UnknownItem(before));
        }
        if item == before {
            return Ok(());
        }

        let order = &mut self.buckets[idx].order;
        Self::remove_from(order, &item);
        Self::insert_before(order, item, &before);
        Ok(())
    }

    /// Atomic composite for cross-bucket insert-before: remove `item` from its
    /// current bucket and insert it immediately before `before` in `target`.
    ///
    /// Readers never observe the intermediate end-of-bucket state.
    pub fn move_before(
        &mut self,
        item: ItemId,
        target: &BucketKey,
        before: ItemId,
    ) -> BoardResult<()> {
        let source = self
            .locations
            .get(&item)
            .cloned()
            .ok_or(BoardError::UnknownItem(item))?;
        let target_idx = self.bucket_index(target)?;
        let source_idx = self.bucket_index(&source)?;
        if !self.buckets[target_idx].order.contains(&before) {
            return Err(BoardError::UnknownItem(before));
        }

        Self::remove_from(&mut self.buckets[source_idx].order, &item);
        Self::insert_before(&mut self.buckets[target_idx].order, item, &before);
        self.locations.insert(item, target.clone());
        Ok(())
    }

    /// Bucket currently holding `item`. O(1).
    pub fn bucket_of(&self, item: &ItemId) -> Option<&BucketKey> {
        self.locations.get(item)
    }

    pub fn bucket(&self, key: &BucketKey) -> BoardResult<&Bucket> {
        self.bucket_index(key).map(|idx| &self.buckets[idx])
    }

    pub fn contains_bucket(&self, key: &BucketKey) -> bool {
        self.index.contains_key(key)
    }

    /// Buckets in declared order.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    /// Total number of assigned items across all buckets.
    pub fn item_count(&self) -> usize {
        self.locations.len()
    }

    fn bucket_index(&self, key: &BucketKey) -> BoardResult<usize> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| BoardError::UnknownBucket(key.clone()))
    }

    fn remove_from(order: &mut Vec<ItemId>, item: &ItemId) {
        order.retain(|id| id != item);
    }

    fn insert_before(order: &mut Vec<ItemId>, item: ItemId, before: &ItemId) {
        // Membership of `before` was validated up front; falling back to a
        // plain append keeps the cover invariant even if that check is ever
        // bypassed.
        let at = order.iter().position(|id| id == before).unwrap_or(order.len());
        order.insert(at, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Item;
    use proptest::prelude::*;

    fn keys(names: &[&str]) -> Vec<BucketKey> {
        names.iter().map(|n| BucketKey::from(*n)).collect()
    }

    fn loaded(names: &[&str], per_bucket: &[Vec<ItemId>]) -> (ItemRegistry, PartitionStore) {
        let mut registry = ItemRegistry::new();
        let items = per_bucket
            .iter()
            .flatten()
            .map(|id| Item::new(*id, 1))
            .collect();
        registry.load(items).unwrap();

        let mut store = PartitionStore::new(keys(names));
        for (name, order) in names.iter().zip(per_bucket) {
            store
                .assign(&registry, &BucketKey::from(*name), order.clone())
                .unwrap();
        }
        (registry, store)
    }

    fn ids(n: usize) -> Vec<ItemId> {
        (0..n).map(|_| ItemId::new()).collect()
    }

    /// Cover invariant: every assigned id is in exactly one bucket, once.
    fn assert_cover(store: &PartitionStore) {
        let mut seen: HashMap<ItemId, &BucketKey> = HashMap::new();
        for bucket in store.buckets() {
            for id in bucket.order() {
                assert!(
                    seen.insert(*id, bucket.key()).is_none(),
                    "{id} appears in more than one bucket"
                );
                assert_eq!(store.bucket_of(id), Some(bucket.key()));
            }
        }
        assert_eq!(seen.len(), store.item_count());
    }

    #[test]
    fn assign_rejects_id_already_in_another_bucket() {
        let items = ids(2);
        let (registry, mut store) = loaded(&["new", "active"], &[items.clone(), vec![]]);

        let err = store
            .assign(&registry, &BucketKey::from("active"), vec![items[0]])
            .unwrap_err();
        assert!(matches!(err, BoardError::InvariantViolation(_)));

        // Store unchanged on failure.
        assert_eq!(store.bucket_of(&items[0]), Some(&BucketKey::from("new")));
        assert_cover(&store);
    }

    #[test]
    fn assign_rejects_unknown_and_duplicate_ids() {
        let items = ids(1);
        let (registry, mut store) = loaded(&["pool"], &[vec![]]);

        let ghost = ItemId::new();
        assert!(matches!(
            store.assign(&registry, &BucketKey::from("pool"), vec![ghost]),
            Err(BoardError::InvariantViolation(_))
        ));
        assert!(matches!(
            store.assign(&registry, &BucketKey::from("pool"), vec![items[0], items[0]]),
            Err(BoardError::InvariantViolation(_))
        ));
    }

    #[test]
    fn move_to_end_appends_and_updates_location() {
        let a = ids(3);
        let (_, mut store) = loaded(&["pool", "stock"], &[a.clone(), vec![]]);

        store.move_to_end(a[0], &BucketKey::from("stock")).unwrap();

        assert_eq!(store.bucket(&BucketKey::from("pool")).unwrap().order(), &a[1..]);
        assert_eq!(store.bucket(&BucketKey::from("stock")).unwrap().order(), &[a[0]]);
        assert_eq!(store.bucket_of(&a[0]), Some(&BucketKey::from("stock")));
        assert_cover(&store);
    }

    #[test]
    fn move_to_end_within_own_bucket_moves_item_last() {
        let a = ids(3);
        let (_, mut store) = loaded(&["pool"], &[a.clone()]);

        store.move_to_end(a[0], &BucketKey::from("pool")).unwrap();
        assert_eq!(
            store.bucket(&BucketKey::from("pool")).unwrap().order(),
            &[a[1], a[2], a[0]]
        );

        // Already last: valid no-op.
        store.move_to_end(a[0], &BucketKey::from("pool")).unwrap();
        assert_eq!(
            store.bucket(&BucketKey::from("pool")).unwrap().order(),
            &[a[1], a[2], a[0]]
        );
        assert_cover(&store);
    }

    #[test]
    fn move_to_end_errors_on_unknown_item_or_bucket() {
        let a = ids(1);
        let (_, mut store) = loaded(&["pool"], &[a.clone()]);

        let ghost = ItemId::new();
        assert_eq!(
            store.move_to_end(ghost, &BucketKey::from("pool")).unwrap_err(),
            BoardError::UnknownItem(ghost)
        );
        assert_eq!(
            store.move_to_end(a[0], &BucketKey::from("nope")).unwrap_err(),
            BoardError::UnknownBucket(BucketKey::from("nope"))
        );
    }

    #[test]
    fn reorder_within_inserts_immediately_before_target() {
        let a = ids(3);
        let (_, mut store) = loaded(&["new"], &[a.clone()]);

        // Drag the last card onto the first: [a, b, c] -> [c, a, b].
        store
            .reorder_within(&BucketKey::from("new"), a[2], a[0])
            .unwrap();
        assert_eq!(
            store.bucket(&BucketKey::from("new")).unwrap().order(),
            &[a[2], a[0], a[1]]
        );

        // And forward: dragging the first onto the last lands just before it.
        store
            .reorder_within(&BucketKey::from("new"), a[2], a[1])
            .unwrap();
        assert_eq!(
            store.bucket(&BucketKey::from("new")).unwrap().order(),
            &[a[0], a[2], a[1]]
        );
        assert_cover(&store);
    }

    #[test]
    fn reorder_within_preserves_membership() {
        let a = ids(2);
        let (_, mut store) = loaded(&["new", "slow"], &[a.clone(), vec![]]);

        store
            .reorder_within(&BucketKey::from("new"), a[1], a[0])
            .unwrap();
        assert_eq!(store.bucket_of(&a[1]), Some(&BucketKey::from("new")));
    }

    #[test]
    fn reorder_within_rejects_cross_bucket_use() {
        let a = ids(2);
        let (_, mut store) = loaded(&["new", "slow"], &[vec![a[0]], vec![a[1]]]);

        let err = store
            .reorder_within(&BucketKey::from("slow"), a[0], a[1])
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::CrossBucketReorder {
                item: a[0],
                requested: BucketKey::from("slow"),
                actual: BucketKey::from("new"),
            }
        );
    }

    #[test]
    fn reorder_within_rejects_before_target_outside_bucket() {
        let a = ids(2);
        let (_, mut store) = loaded(&["new", "slow"], &[vec![a[0]], vec![a[1]]]);

        assert_eq!(
            store
                .reorder_within(&BucketKey::from("new"), a[0], a[1])
                .unwrap_err(),
            BoardError::UnknownItem(a[1])
        );
    }

    #[test]
    fn move_before_lands_in_target_bucket_before_hovered_item() {
        let a = ids(2);
        let b = ids(2);
        let (_, mut store) = loaded(&["new", "slow"], &[a.clone(), b.clone()]);

        store
            .move_before(a[0], &BucketKey::from("slow"), b[1])
            .unwrap();

        assert_eq!(store.bucket(&BucketKey::from("new")).unwrap().order(), &[a[1]]);
        assert_eq!(
            store.bucket(&BucketKey::from("slow")).unwrap().order(),
            &[b[0], a[0], b[1]]
        );
        assert_eq!(store.bucket_of(&a[0]), Some(&BucketKey::from("slow")));
        assert_cover(&store);
    }

    #[test]
    fn failed_move_before_leaves_store_untouched() {
        let a = ids(2);
        let (_, mut store) = loaded(&["new", "slow"], &[a.clone(), vec![]]);
        let snapshot = store.clone();

        // `before` is not in the target bucket.
        assert!(store.move_before(a[0], &BucketKey::from("slow"), a[1]).is_err());

        assert_eq!(
            store.bucket(&BucketKey::from("new")).unwrap().order(),
            snapshot.bucket(&BucketKey::from("new")).unwrap().order()
        );
        assert_eq!(store.bucket_of(&a[0]), Some(&BucketKey::from("new")));
    }

    #[test]
    fn duplicate_bucket_keys_collapse() {
        let store = PartitionStore::new(keys(&["pool", "pool", "stock"]));
        assert_eq!(store.buckets().count(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any sequence of moves and reorders preserves the total,
        /// disjoint cover and the total item count.
        #[test]
        fn cover_invariant_holds_under_random_moves(
            ops in prop::collection::vec((0usize..64, 0usize..3, 0usize..64), 0..64)
        ) {
            let bucket_names = ["new", "active", "slow"];
            let items = ids(8);
            let (_, mut store) = loaded(
                &bucket_names,
                &[items[0..3].to_vec(), items[3..6].to_vec(), items[6..8].to_vec()],
            );
            let total = store.item_count();

            for (item_sel, bucket_sel, before_sel) in ops {
                let item = items[item_sel % items.len()];
                let bucket = BucketKey::from(bucket_names[bucket_sel]);
                let before = items[before_sel % items.len()];

                // Alternate the three mutation kinds; errors are fine, partial
                // mutation is not.
                match item_sel % 3 {
                    0 => { let _ = store.move_to_end(item, &bucket); }
                    1 => { let _ = store.reorder_within(&bucket, item, before); }
                    _ => { let _ = store.move_before(item, &bucket, before); }
                }

                assert_cover(&store);
                prop_assert_eq!(store.item_count(), total);
            }
        }
    }
}
