//! Implements an in-memory inventory store.

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::{
    Error,
    db::lock,
    inventory::{InventoryItem, InventoryItemId, InventoryPatch, InventoryStore, NewInventoryItem},
    memory_table::MemoryTable,
};

/// Stores inventory items in a map. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    table: Mutex<MemoryTable<InventoryItem>>,
}

impl MemoryInventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryStore for MemoryInventoryStore {
    /// Items are sorted alphabetically by name, ignoring case.
    fn get_all(&self) -> Result<Vec<InventoryItem>, Error> {
        let mut items: Vec<InventoryItem> = lock(&self.table)?.values().cloned().collect();

        items.sort_by_cached_key(|item| item.name.to_lowercase());

        Ok(items)
    }

    fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, Error> {
        Ok(lock(&self.table)?.get(id))
    }

    fn create(&self, item: NewInventoryItem) -> Result<InventoryItem, Error> {
        let now = OffsetDateTime::now_utc();

        Ok(lock(&self.table)?.insert_with(|id| item.into_item(id, now)))
    }

    fn update(
        &self,
        id: InventoryItemId,
        patch: InventoryPatch,
    ) -> Result<Option<InventoryItem>, Error> {
        let mut table = lock(&self.table)?;

        Ok(table.get_mut(id).map(|item| {
            patch.apply_to(item, OffsetDateTime::now_utc());
            item.clone()
        }))
    }

    fn delete(&self, id: InventoryItemId) -> Result<bool, Error> {
        Ok(lock(&self.table)?.remove(id))
    }
}

#[cfg(test)]
crate::inventory::store::inventory_store_tests!(
    memory_store_tests,
    crate::inventory::MemoryInventoryStore::new()
);

#[cfg(test)]
mod memory_inventory_tests {
    use rust_decimal::Decimal;

    use crate::inventory::{InventoryStore, MemoryInventoryStore, NewInventoryItem};

    #[test]
    fn get_all_sorts_by_name_ignoring_case() {
        let store = MemoryInventoryStore::new();
        for name in ["tractor oil", "Barley", "hay"] {
            store
                .create(NewInventoryItem {
                    name: name.to_owned(),
                    quantity: Decimal::ONE,
                    unit: "unit".to_owned(),
                    value: None,
                })
                .unwrap();
        }

        let names: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();

        assert_eq!(names, vec!["Barley", "hay", "tractor oil"]);
    }
}
