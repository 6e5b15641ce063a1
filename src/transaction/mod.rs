//! Income and expense transactions.
//!
//! This module contains:
//! - The [Transaction] model, the data for creating and updating one, and the
//!   request forms those are validated from
//! - The [TransactionStore] trait with in-memory and SQLite implementations
//! - [TransactionFilter] for searching a list of transactions
//! - The JSON API endpoints for listing, creating, updating and deleting transactions

mod domain;
mod endpoints;
mod filter;
mod memory;
mod sqlite;
mod store;

pub use domain::{
    NewTransaction, Transaction, TransactionForm, TransactionId, TransactionPatch,
    TransactionPatchForm, TransactionType,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_endpoint,
};
pub use filter::{TransactionFilter, TransactionQuery};
pub use memory::MemoryTransactionStore;
pub use sqlite::{SQLiteTransactionStore, create_transaction_table};
pub use store::TransactionStore;
