//! A map-backed table used by the in-memory stores.

use std::collections::BTreeMap;

use crate::database_id::DatabaseId;

/// Records keyed by ID, with IDs handed out in increasing order starting at 1.
///
/// IDs of deleted records are not reused.
#[derive(Debug)]
pub(crate) struct MemoryTable<T> {
    records: BTreeMap<DatabaseId, T>,
    last_id: DatabaseId,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    /// Assign the next ID, build the record with `make_record` and store it.
    pub(crate) fn insert_with(&mut self, make_record: impl FnOnce(DatabaseId) -> T) -> T {
        self.last_id += 1;
        let record = make_record(self.last_id);
        self.records.insert(self.last_id, record.clone());

        record
    }

    pub(crate) fn get(&self, id: DatabaseId) -> Option<T> {
        self.records.get(&id).cloned()
    }

    pub(crate) fn get_mut(&mut self, id: DatabaseId) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    /// All records in ID order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    /// Remove a record, returning whether it existed.
    pub(crate) fn remove(&mut self, id: DatabaseId) -> bool {
        self.records.remove(&id).is_some()
    }
}
