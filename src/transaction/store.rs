//! Defines the transaction store trait.

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionPatch},
};

/// Handles the creation, retrieval, update and deletion of transactions.
///
/// Missing records are reported with `None` or `false`. Errors are reserved
/// for failures of the underlying storage.
pub trait TransactionStore: Send + Sync {
    /// Create a new transaction, assigning its ID and creation time.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction by its ID.
    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error>;

    /// Retrieve all transactions, most recently created first.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Merge `patch` into the transaction with `id` and return the updated transaction.
    fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, Error>;

    /// Delete the transaction with `id`, returning whether it existed.
    fn delete(&self, id: TransactionId) -> Result<bool, Error>;
}

/// Runs the same contract tests against every [TransactionStore] implementation.
#[cfg(test)]
macro_rules! transaction_store_tests {
    ($module:ident, $make_store:expr) => {
        #[cfg(test)]
        mod $module {
            use rust_decimal::Decimal;
            use time::macros::date;

            use crate::transaction::{
                NewTransaction, TransactionPatch, TransactionStore, TransactionType,
            };

            #[allow(unused_imports)]
            use super::*;

            fn wheat_sale() -> NewTransaction {
                NewTransaction::build(
                    TransactionType::Income,
                    "Wheat harvest",
                    Decimal::new(10000, 2),
                    "Crop Sales",
                    date!(2024 - 01 - 05),
                )
                .payment_method(Some("Bank Transfer"))
            }

            fn fertilizer() -> NewTransaction {
                NewTransaction::build(
                    TransactionType::Expense,
                    "Nitrogen",
                    Decimal::new(4000, 2),
                    "Fertilizer",
                    date!(2024 - 01 - 10),
                )
            }

            #[test]
            fn create_then_get_returns_input() {
                let store = $make_store;
                let input = wheat_sale().receipt(Some("/receipts/1.pdf"), Some("1.pdf"));

                let created = store.create(input.clone()).expect("Could not create transaction");
                let got = store
                    .get(created.id)
                    .expect("Could not get transaction")
                    .expect("Transaction should exist");

                assert_eq!(got, created);
                assert!(got.id > 0);
                assert_eq!(got.transaction_type, input.transaction_type);
                assert_eq!(got.description, input.description);
                assert_eq!(got.amount, input.amount);
                assert_eq!(got.category, input.category);
                assert_eq!(got.date, input.date);
                assert_eq!(got.payment_method, input.payment_method);
                assert_eq!(got.receipt_url, input.receipt_url);
                assert_eq!(got.receipt_filename, input.receipt_filename);
            }

            #[test]
            fn get_missing_returns_none() {
                let store = $make_store;

                let got = store.get(999).expect("Could not query store");

                assert_eq!(got, None);
            }

            #[test]
            fn get_all_returns_newest_first() {
                let store = $make_store;
                let first = store.create(wheat_sale()).unwrap();
                let second = store.create(fertilizer()).unwrap();

                let got = store.get_all().expect("Could not get transactions");

                assert_eq!(got, vec![second, first]);
            }

            #[test]
            fn update_merges_supplied_fields() {
                let store = $make_store;
                let created = store.create(wheat_sale()).unwrap();
                let patch = TransactionPatch {
                    amount: Some(Decimal::new(12550, 2)),
                    payment_method: Some(None),
                    ..Default::default()
                };

                let updated = store
                    .update(created.id, patch)
                    .expect("Could not update transaction")
                    .expect("Transaction should exist");

                assert_eq!(updated.amount, Decimal::new(12550, 2));
                assert_eq!(updated.payment_method, None);
                assert_eq!(updated.description, created.description);
                assert_eq!(updated.created_at, created.created_at);
                assert_eq!(store.get(created.id).unwrap(), Some(updated));
            }

            #[test]
            fn update_missing_returns_none() {
                let store = $make_store;

                let got = store.update(42, TransactionPatch::default()).unwrap();

                assert_eq!(got, None);
            }

            #[test]
            fn delete_removes_transaction() {
                let store = $make_store;
                let created = store.create(fertilizer()).unwrap();

                let deleted = store.delete(created.id).expect("Could not delete transaction");

                assert!(deleted);
                assert_eq!(store.get(created.id).unwrap(), None);
            }

            #[test]
            fn delete_missing_returns_false() {
                let store = $make_store;

                let deleted = store.delete(123).expect("Delete should not error");

                assert!(!deleted);
            }

            #[test]
            fn duplicate_creates_are_separate_records() {
                let store = $make_store;

                let first = store.create(fertilizer()).unwrap();
                let second = store.create(fertilizer()).unwrap();

                assert_ne!(first.id, second.id);
                assert_eq!(store.get_all().unwrap().len(), 2);
            }
        }
    };
}

#[cfg(test)]
pub(crate) use transaction_store_tests;
