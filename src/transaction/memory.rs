//! Implements an in-memory transaction store.

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::{
    Error,
    db::lock,
    memory_table::MemoryTable,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionStore},
};

/// Stores transactions in a map. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    table: Mutex<MemoryTable<Transaction>>,
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();

        Ok(lock(&self.table)?.insert_with(|id| transaction.into_transaction(id, created_at)))
    }

    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        Ok(lock(&self.table)?.get(id))
    }

    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        let mut transactions: Vec<Transaction> = lock(&self.table)?.values().cloned().collect();

        transactions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(transactions)
    }

    fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, Error> {
        let mut table = lock(&self.table)?;

        Ok(table.get_mut(id).map(|transaction| {
            patch.apply_to(transaction);
            transaction.clone()
        }))
    }

    fn delete(&self, id: TransactionId) -> Result<bool, Error> {
        Ok(lock(&self.table)?.remove(id))
    }
}

#[cfg(test)]
crate::transaction::store::transaction_store_tests!(
    memory_store_tests,
    crate::transaction::MemoryTransactionStore::new()
);
