//! Implements a SQLite backed inventory store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{get_decimal, get_optional_decimal, lock},
    inventory::{InventoryItem, InventoryItemId, InventoryPatch, InventoryStore, NewInventoryItem},
};

const INVENTORY_COLUMNS: &str = "id, name, quantity, unit, value, last_updated";

/// Creates, retrieves, updates and deletes inventory items in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteInventoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteInventoryStore {
    /// Create a new inventory store with a SQLite database.
    ///
    /// The database should already have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl InventoryStore for SQLiteInventoryStore {
    /// Items are returned most recently updated first.
    fn get_all(&self) -> Result<Vec<InventoryItem>, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(&format!(
                "SELECT {INVENTORY_COLUMNS} FROM inventory_items ORDER BY last_updated DESC, id DESC"
            ))?
            .query_map([], map_inventory_row)?
            .map(|maybe_item| maybe_item.map_err(|error| error.into()))
            .collect()
    }

    fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, Error> {
        let connection = lock(&self.connection)?;
        get_inventory_item(id, &connection)
    }

    fn create(&self, item: NewInventoryItem) -> Result<InventoryItem, Error> {
        let connection = lock(&self.connection)?;

        let item = connection
            .prepare(&format!(
                "INSERT INTO inventory_items (name, quantity, unit, value, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {INVENTORY_COLUMNS}"
            ))?
            .query_row(
                (
                    item.name,
                    item.quantity.to_string(),
                    item.unit,
                    item.value.map(|value| value.to_string()),
                    OffsetDateTime::now_utc(),
                ),
                map_inventory_row,
            )?;

        Ok(item)
    }

    fn update(
        &self,
        id: InventoryItemId,
        patch: InventoryPatch,
    ) -> Result<Option<InventoryItem>, Error> {
        let connection = lock(&self.connection)?;

        let Some(mut item) = get_inventory_item(id, &connection)? else {
            return Ok(None);
        };

        patch.apply_to(&mut item, OffsetDateTime::now_utc());

        connection.execute(
            "UPDATE inventory_items
             SET name = ?1, quantity = ?2, unit = ?3, value = ?4, last_updated = ?5
             WHERE id = ?6",
            (
                &item.name,
                item.quantity.to_string(),
                &item.unit,
                item.value.map(|value| value.to_string()),
                item.last_updated,
                id,
            ),
        )?;

        Ok(Some(item))
    }

    fn delete(&self, id: InventoryItemId) -> Result<bool, Error> {
        let rows_affected = lock(&self.connection)?
            .execute("DELETE FROM inventory_items WHERE id = ?1", [id])?;

        Ok(rows_affected > 0)
    }
}

fn get_inventory_item(
    id: InventoryItemId,
    connection: &Connection,
) -> Result<Option<InventoryItem>, Error> {
    connection
        .prepare(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory_items WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_inventory_row)
        .optional()
        .map_err(|error| error.into())
}

/// Create the inventory table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_inventory_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS inventory_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            quantity TEXT NOT NULL,
            unit TEXT NOT NULL,
            value TEXT,
            last_updated TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_inventory_row(row: &Row) -> Result<InventoryItem, rusqlite::Error> {
    Ok(InventoryItem {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: get_decimal(row, 2)?,
        unit: row.get(3)?,
        value: get_optional_decimal(row, 4)?,
        last_updated: row.get(5)?,
    })
}

#[cfg(test)]
fn get_test_store() -> SQLiteInventoryStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    create_inventory_table(&connection).expect("Could not create inventory table");

    SQLiteInventoryStore::new(Arc::new(Mutex::new(connection)))
}

#[cfg(test)]
crate::inventory::store::inventory_store_tests!(sqlite_store_tests, get_test_store());
