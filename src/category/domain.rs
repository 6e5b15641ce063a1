//! Category types and the request form for creating a category.

use serde::{Deserialize, Serialize};

use crate::{
    database_id::DatabaseId,
    transaction::TransactionType,
    validation::{FieldError, Validate, optional_text, parse, required_text},
};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A named grouping for transactions, e.g. "Fertilizer".
///
/// A category belongs to either income or expenses and this never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name.
    pub name: String,
    /// Whether the category groups income or expenses.
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    /// The name of an icon to show next to the category.
    pub icon: Option<String>,
}

/// The data needed to create a [Category].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub category_type: TransactionType,
    pub icon: Option<String>,
}

impl NewCategory {
    pub fn new(name: &str, category_type: TransactionType, icon: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            category_type,
            icon: icon.map(str::to_owned),
        }
    }

    /// Attach the store-assigned ID.
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            name: self.name,
            category_type: self.category_type,
            icon: self.icon,
        }
    }
}

/// The categories every new ledger starts with, as (name, type, icon).
pub const DEFAULT_CATEGORIES: [(&str, TransactionType, &str); 14] = [
    ("Crop Sales", TransactionType::Income, "seedling"),
    ("Livestock Sales", TransactionType::Income, "cow"),
    ("Subsidies", TransactionType::Income, "hand-holding-dollar"),
    ("Grants", TransactionType::Income, "gift"),
    ("Other Income", TransactionType::Income, "plus"),
    ("Seeds & Plants", TransactionType::Expense, "seedling"),
    ("Equipment", TransactionType::Expense, "tools"),
    ("Labor", TransactionType::Expense, "users"),
    ("Utilities", TransactionType::Expense, "bolt"),
    ("Fertilizer", TransactionType::Expense, "flask"),
    ("Fuel", TransactionType::Expense, "gas-pump"),
    ("Insurance", TransactionType::Expense, "shield"),
    ("Maintenance", TransactionType::Expense, "wrench"),
    ("Other Expenses", TransactionType::Expense, "minus"),
];

/// The default categories ready to be inserted into a store.
pub fn default_categories() -> impl Iterator<Item = NewCategory> {
    DEFAULT_CATEGORIES
        .into_iter()
        .map(|(name, category_type, icon)| NewCategory::new(name, category_type, Some(icon)))
}

/// The JSON body for creating a category.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub icon: Option<String>,
}

impl Validate for CategoryForm {
    type Output = NewCategory;

    const INVALID_MESSAGE: &'static str = "Invalid category data";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required_text("name", self.name, &mut errors);
        let category_type = match self.category_type {
            Some(value) => parse::<TransactionType>(
                "type",
                &value,
                "Expected \"income\" or \"expense\"",
                &mut errors,
            ),
            None => {
                errors.push(FieldError::new("type", "Required"));
                None
            }
        };

        match (name, category_type) {
            (Some(name), Some(category_type)) => Ok(NewCategory {
                name,
                category_type,
                icon: optional_text(self.icon),
            }),
            _ => Err(errors),
        }
    }
}
