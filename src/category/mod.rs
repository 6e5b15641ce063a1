//! Categories group transactions, e.g. "Fertilizer" or "Crop Sales".
//!
//! Every category belongs to either income or expenses. A fresh ledger is
//! seeded with a set of common farm categories.

mod domain;
mod endpoints;
mod memory;
mod sqlite;
mod store;

pub use domain::{Category, CategoryForm, DEFAULT_CATEGORIES, NewCategory, default_categories};
pub use endpoints::{create_category_endpoint, get_categories_endpoint};
pub use memory::MemoryCategoryStore;
pub use sqlite::{SQLiteCategoryStore, create_category_table, seed_default_categories};
pub use store::CategoryStore;
