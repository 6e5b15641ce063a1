//! Implements an in-memory category store.

use std::sync::Mutex;

use crate::{
    Error,
    category::{Category, CategoryStore, NewCategory, default_categories},
    db::lock,
    memory_table::MemoryTable,
    transaction::TransactionType,
};

/// Stores categories in a map. Nothing is persisted.
#[derive(Debug)]
pub struct MemoryCategoryStore {
    table: Mutex<MemoryTable<Category>>,
}

impl MemoryCategoryStore {
    /// Create a store holding the default categories.
    pub fn new() -> Self {
        let mut table = MemoryTable::default();

        for category in default_categories() {
            table.insert_with(|id| category.into_category(id));
        }

        Self {
            table: Mutex::new(table),
        }
    }
}

impl Default for MemoryCategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryStore for MemoryCategoryStore {
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        Ok(lock(&self.table)?.values().cloned().collect())
    }

    fn get_by_type(&self, category_type: TransactionType) -> Result<Vec<Category>, Error> {
        Ok(lock(&self.table)?
            .values()
            .filter(|category| category.category_type == category_type)
            .cloned()
            .collect())
    }

    fn create(&self, category: NewCategory) -> Result<Category, Error> {
        Ok(lock(&self.table)?.insert_with(|id| category.into_category(id)))
    }
}

#[cfg(test)]
crate::category::store::category_store_tests!(
    memory_store_tests,
    crate::category::MemoryCategoryStore::new()
);
