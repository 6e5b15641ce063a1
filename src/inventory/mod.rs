//! Farm inventory: stock on hand such as seed, feed and fuel.

mod domain;
mod endpoints;
mod memory;
mod sqlite;
mod store;

pub use domain::{
    InventoryForm, InventoryItem, InventoryItemId, InventoryPatch, InventoryPatchForm,
    NewInventoryItem,
};
pub use endpoints::{
    create_inventory_item_endpoint, delete_inventory_item_endpoint, get_inventory_endpoint,
    get_inventory_item_endpoint, update_inventory_item_endpoint,
};
pub use memory::MemoryInventoryStore;
pub use sqlite::{SQLiteInventoryStore, create_inventory_table};
pub use store::InventoryStore;
