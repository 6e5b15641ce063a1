//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryStore, NewCategory, default_categories},
    db::lock,
    transaction::TransactionType,
};

/// Creates and retrieves categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    ///
    /// The database should already have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare("SELECT id, name, type, icon FROM categories ORDER BY id")?
            .query_map([], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    fn get_by_type(&self, category_type: TransactionType) -> Result<Vec<Category>, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare("SELECT id, name, type, icon FROM categories WHERE type = ?1 ORDER BY id")?
            .query_map([category_type], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    fn create(&self, category: NewCategory) -> Result<Category, Error> {
        let connection = lock(&self.connection)?;
        create_category(category, &connection).map_err(|error| error.into())
    }
}

fn create_category(
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, rusqlite::Error> {
    connection
        .prepare(
            "INSERT INTO categories (name, type, icon) VALUES (?1, ?2, ?3)
             RETURNING id, name, type, icon",
        )?
        .query_row(
            (category.name, category.category_type, category.icon),
            map_category_row,
        )
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            icon TEXT
        )",
        (),
    )?;

    Ok(())
}

/// Insert the default categories if the category table is empty.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM categories", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    for category in default_categories() {
        create_category(category, connection)?;
    }

    tracing::info!("seeded the default categories");

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        category_type: row.get(2)?,
        icon: row.get(3)?,
    })
}

#[cfg(test)]
fn get_test_store() -> SQLiteCategoryStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    create_category_table(&connection).expect("Could not create category table");
    seed_default_categories(&connection).expect("Could not seed categories");

    SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
}

#[cfg(test)]
crate::category::store::category_store_tests!(sqlite_store_tests, get_test_store());
