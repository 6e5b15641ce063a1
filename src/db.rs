//! Database initialization and helpers shared by the SQLite stores.

use std::{
    str::FromStr,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    inventory::create_inventory_table,
    transaction::create_transaction_table,
};

/// Create the application's tables if they do not exist and seed the default categories.
///
/// Categories are only seeded when the category table is empty, so calling
/// this on an existing database is safe.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;
    create_category_table(connection)?;
    create_inventory_table(connection)?;
    seed_default_categories(connection)?;

    Ok(())
}

/// Acquire `mutex`, logging and converting a poisoned lock into [Error::DatabaseLockError].
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, Error> {
    mutex
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Read a decimal stored as TEXT from column `index`.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;
    parse_decimal(index, &raw)
}

/// Read a nullable decimal stored as TEXT from column `index`.
pub(crate) fn get_optional_decimal(
    row: &Row,
    index: usize,
) -> Result<Option<Decimal>, rusqlite::Error> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|raw| parse_decimal(index, &raw)).transpose()
}

fn parse_decimal(index: usize, raw: &str) -> Result<Decimal, rusqlite::Error> {
    Decimal::from_str(raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");
        initialize(&connection).expect("Could not initialize database a second time");

        let category_count: i64 = connection
            .query_row("SELECT COUNT(id) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(category_count, 14);
    }

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        for table in ["transactions", "categories", "inventory_items"] {
            let count: i64 = connection
                .query_row(
                    "SELECT COUNT(name) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();

            assert_eq!(count, 1, "table {table} is missing");
        }
    }
}
