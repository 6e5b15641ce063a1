//! Defines the inventory store trait.

use crate::{
    Error,
    inventory::{InventoryItem, InventoryItemId, InventoryPatch, NewInventoryItem},
};

/// Handles the creation, retrieval, update and deletion of inventory items.
///
/// Missing records are reported with `None` or `false`.
pub trait InventoryStore: Send + Sync {
    /// Get every inventory item.
    ///
    /// The order depends on the implementation.
    fn get_all(&self) -> Result<Vec<InventoryItem>, Error>;

    /// Get an inventory item by its ID.
    fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, Error>;

    /// Create a new inventory item, setting its last updated time.
    fn create(&self, item: NewInventoryItem) -> Result<InventoryItem, Error>;

    /// Merge `patch` into the item with `id` and refresh its last updated time.
    fn update(
        &self,
        id: InventoryItemId,
        patch: InventoryPatch,
    ) -> Result<Option<InventoryItem>, Error>;

    /// Delete the item with `id`, returning whether it existed.
    fn delete(&self, id: InventoryItemId) -> Result<bool, Error>;
}

/// Runs the same contract tests against every [InventoryStore] implementation.
#[cfg(test)]
macro_rules! inventory_store_tests {
    ($module:ident, $make_store:expr) => {
        #[cfg(test)]
        mod $module {
            use rust_decimal::Decimal;

            use crate::inventory::{InventoryPatch, InventoryStore, NewInventoryItem};

            #[allow(unused_imports)]
            use super::*;

            fn seed_bags() -> NewInventoryItem {
                NewInventoryItem {
                    name: "Seed bags".to_owned(),
                    quantity: Decimal::new(4000, 2),
                    unit: "bags".to_owned(),
                    value: Some(Decimal::new(120000, 2)),
                }
            }

            #[test]
            fn create_then_get_returns_input() {
                let store = $make_store;
                let input = seed_bags();

                let created = store.create(input.clone()).expect("Could not create item");
                let got = store
                    .get(created.id)
                    .expect("Could not get item")
                    .expect("Item should exist");

                assert_eq!(got, created);
                assert_eq!(got.name, input.name);
                assert_eq!(got.quantity, input.quantity);
                assert_eq!(got.unit, input.unit);
                assert_eq!(got.value, input.value);
            }

            #[test]
            fn get_missing_returns_none() {
                let store = $make_store;

                assert_eq!(store.get(5).expect("Could not query store"), None);
            }

            #[test]
            fn get_all_returns_every_item() {
                let store = $make_store;
                let mut hay = seed_bags();
                hay.name = "Hay".to_owned();
                store.create(seed_bags()).unwrap();
                store.create(hay).unwrap();

                let mut names: Vec<_> = store
                    .get_all()
                    .expect("Could not get items")
                    .into_iter()
                    .map(|item| item.name)
                    .collect();
                names.sort();

                assert_eq!(names, vec!["Hay", "Seed bags"]);
            }

            #[test]
            fn update_merges_and_refreshes_last_updated() {
                let store = $make_store;
                let created = store.create(seed_bags()).unwrap();
                let patch = InventoryPatch {
                    quantity: Some(Decimal::new(3500, 2)),
                    value: Some(None),
                    ..Default::default()
                };

                let updated = store
                    .update(created.id, patch)
                    .expect("Could not update item")
                    .expect("Item should exist");

                assert_eq!(updated.quantity, Decimal::new(3500, 2));
                assert_eq!(updated.value, None);
                assert_eq!(updated.name, created.name);
                assert!(updated.last_updated >= created.last_updated);
                assert_eq!(store.get(created.id).unwrap(), Some(updated));
            }

            #[test]
            fn update_missing_returns_none() {
                let store = $make_store;

                let got = store.update(9, InventoryPatch::default()).unwrap();

                assert_eq!(got, None);
            }

            #[test]
            fn delete_reports_whether_item_existed() {
                let store = $make_store;
                let created = store.create(seed_bags()).unwrap();

                assert!(store.delete(created.id).unwrap());
                assert!(!store.delete(created.id).unwrap());
                assert_eq!(store.get(created.id).unwrap(), None);
            }
        }
    };
}

#[cfg(test)]
pub(crate) use inventory_store_tests;
