//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    category::{CategoryStore, MemoryCategoryStore, SQLiteCategoryStore},
    db::initialize,
    inventory::{InventoryStore, MemoryInventoryStore, SQLiteInventoryStore},
    transaction::{MemoryTransactionStore, SQLiteTransactionStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store for income and expense transactions.
    pub transaction_store: Arc<dyn TransactionStore>,

    /// The store for transaction categories.
    pub category_store: Arc<dyn CategoryStore>,

    /// The store for inventory items.
    pub inventory_store: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Create a new [AppState] backed by a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models and seeding the default categories.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            transaction_store: Arc::new(SQLiteTransactionStore::new(connection.clone())),
            category_store: Arc::new(SQLiteCategoryStore::new(connection.clone())),
            inventory_store: Arc::new(SQLiteInventoryStore::new(connection)),
        })
    }

    /// Create a new [AppState] that keeps everything in memory.
    ///
    /// Nothing is persisted once the server stops.
    pub fn in_memory() -> Self {
        Self {
            transaction_store: Arc::new(MemoryTransactionStore::new()),
            category_store: Arc::new(MemoryCategoryStore::new()),
            inventory_store: Arc::new(MemoryInventoryStore::new()),
        }
    }
}
