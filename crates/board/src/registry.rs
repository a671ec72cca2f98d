//! Item registry: the flat set of draggable entities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use partdesk_core::{BoardError, BoardResult, Entity, ItemId};

/// A draggable entity as the engine sees it.
///
/// The payload behind the id (account fields, supplier row, ...) lives with the
/// host; the engine only needs stable identity and the weight the projector
/// sums (e.g. a supplier's parts count; 1 for CRM accounts).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    weight: u64,
}

impl Item {
    pub fn new(id: ItemId, weight: u64) -> Self {
        Self { id, weight }
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// The known item set.
///
/// Populated once per load; items are immutable afterwards. Bucket membership
/// and order are owned by the partition store, not the registry.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<ItemId, Item>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known item set.
    ///
    /// Duplicate ids in the input are an `InvariantViolation`; the registry is
    /// left unchanged in that case.
    pub fn load(&mut self, items: Vec<Item>) -> BoardResult<()> {
        let mut next = HashMap::with_capacity(items.len());
        for item in items {
            let id = *item.id();
            if next.insert(id, item).is_some() {
                return Err(BoardError::invariant(format!(
                    "duplicate item id in load: {id}"
                )));
            }
        }
        self.items = next;
        Ok(())
    }

    pub fn get(&self, id: &ItemId) -> BoardResult<&Item> {
        self.items.get(id).ok_or(BoardError::UnknownItem(*id))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Weight of an item, if registered.
    pub fn weight_of(&self, id: &ItemId) -> Option<u64> {
        self.items.get(id).map(Item::weight)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
