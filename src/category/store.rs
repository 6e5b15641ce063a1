//! Defines the category store trait.

use crate::{
    Error,
    category::{Category, NewCategory},
    transaction::TransactionType,
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore: Send + Sync {
    /// Get every category in the order they were created.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Get the categories for either income or expenses.
    fn get_by_type(&self, category_type: TransactionType) -> Result<Vec<Category>, Error>;

    /// Create a new category and add it to the store.
    fn create(&self, category: NewCategory) -> Result<Category, Error>;
}

/// Runs the same contract tests against every [CategoryStore] implementation.
///
/// `$make_store` must produce a store that holds only the default categories.
#[cfg(test)]
macro_rules! category_store_tests {
    ($module:ident, $make_store:expr) => {
        #[cfg(test)]
        mod $module {
            use crate::{
                category::{CategoryStore, DEFAULT_CATEGORIES, NewCategory},
                transaction::TransactionType,
            };

            #[allow(unused_imports)]
            use super::*;

            #[test]
            fn starts_with_default_categories() {
                let store = $make_store;

                let got = store.get_all().expect("Could not get categories");

                let names: Vec<_> = got.iter().map(|category| category.name.as_str()).collect();
                let want: Vec<_> = DEFAULT_CATEGORIES.iter().map(|(name, _, _)| *name).collect();
                assert_eq!(names, want);
            }

            #[test]
            fn get_by_type_only_returns_matching_categories() {
                let store = $make_store;

                let got = store
                    .get_by_type(TransactionType::Expense)
                    .expect("Could not get categories");

                assert_eq!(got.len(), 9);
                assert!(
                    got.iter()
                        .all(|category| category.category_type == TransactionType::Expense)
                );
            }

            #[test]
            fn create_appends_category() {
                let store = $make_store;

                let created = store
                    .create(NewCategory::new("Hay", TransactionType::Income, Some("wheat")))
                    .expect("Could not create category");

                let all = store.get_all().unwrap();
                assert_eq!(all.last(), Some(&created));
                assert_eq!(created.icon.as_deref(), Some("wheat"));
                assert!(
                    store
                        .get_by_type(TransactionType::Income)
                        .unwrap()
                        .contains(&created)
                );
            }
        }
    };
}

#[cfg(test)]
pub(crate) use category_store_tests;
