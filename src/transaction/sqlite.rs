//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{get_decimal, lock},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionPatch, TransactionStore},
};

const TRANSACTION_COLUMNS: &str = "id, type, description, amount, category, date, \
    payment_method, receipt_url, receipt_filename, created_at";

/// Creates, retrieves, updates and deletes transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store with a SQLite database.
    ///
    /// The database should already have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = lock(&self.connection)?;
        create_transaction(transaction, &connection)
    }

    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        let connection = lock(&self.connection)?;
        get_transaction(id, &connection)
    }

    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        let connection = lock(&self.connection)?;
        get_all_transactions(&connection)
    }

    fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, Error> {
        let connection = lock(&self.connection)?;
        update_transaction(id, patch, &connection)
    }

    fn delete(&self, id: TransactionId) -> Result<bool, Error> {
        let connection = lock(&self.connection)?;
        delete_transaction(id, &connection)
    }
}

/// Insert a transaction and return it with its generated ID and creation time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO transactions (type, description, amount, category, date, \
                payment_method, receipt_url, receipt_filename, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.transaction_type,
                transaction.description,
                transaction.amount.to_string(),
                transaction.category,
                transaction.date,
                transaction.payment_method,
                transaction.receipt_url,
                transaction.receipt_filename,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction by its `id`, or `None` if there is no such transaction.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all transactions, most recently created first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Merge `patch` into the stored transaction.
///
/// Returns `None` if there is no transaction with `id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn update_transaction(
    id: TransactionId,
    patch: TransactionPatch,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let Some(mut transaction) = get_transaction(id, connection)? else {
        return Ok(None);
    };

    patch.apply_to(&mut transaction);

    connection.execute(
        "UPDATE transactions
         SET type = ?1, description = ?2, amount = ?3, category = ?4, date = ?5,
             payment_method = ?6, receipt_url = ?7, receipt_filename = ?8
         WHERE id = ?9",
        (
            transaction.transaction_type,
            &transaction.description,
            transaction.amount.to_string(),
            &transaction.category,
            transaction.date,
            &transaction.payment_method,
            &transaction.receipt_url,
            &transaction.receipt_filename,
            id,
        ),
    )?;

    Ok(Some(transaction))
}

/// Delete a transaction, returning whether it existed.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    Ok(rows_affected > 0)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            payment_method TEXT,
            receipt_url TEXT,
            receipt_filename TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_created_at ON transactions(created_at);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        description: row.get(2)?,
        amount: get_decimal(row, 3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        payment_method: row.get(6)?,
        receipt_url: row.get(7)?,
        receipt_filename: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
fn get_test_store() -> SQLiteTransactionStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    create_transaction_table(&connection).expect("Could not create transaction table");

    SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
}

#[cfg(test)]
crate::transaction::store::transaction_store_tests!(sqlite_store_tests, get_test_store());

#[cfg(test)]
mod sqlite_transaction_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::transaction::{NewTransaction, TransactionStore, TransactionType};

    use super::get_test_store;

    #[test]
    fn amounts_keep_two_decimal_places() {
        let store = get_test_store();
        let created = store
            .create(NewTransaction::build(
                TransactionType::Expense,
                "Diesel",
                Decimal::new(5000, 2),
                "Fuel",
                date!(2024 - 03 - 01),
            ))
            .unwrap();

        let got = store.get(created.id).unwrap().unwrap();

        assert_eq!(got.amount.to_string(), "50.00");
    }
}
