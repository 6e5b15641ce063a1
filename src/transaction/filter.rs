//! Narrowing a transaction list by search text, category and type.

use serde::{Deserialize, Serialize};

use crate::{
    transaction::{Transaction, TransactionType},
    validation::{FieldError, Validate, optional_text, parse},
};

/// Which transactions to show in a list.
///
/// Every criterion that is `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Text that must appear in the description or category, ignoring case.
    pub search: Option<String>,
    /// The exact category name.
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// Whether `transaction` meets every criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|search| {
            let search = search.to_lowercase();

            transaction.description.to_lowercase().contains(&search)
                || transaction.category.to_lowercase().contains(&search)
        });
        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| transaction.category == category);
        let matches_type = self
            .transaction_type
            .is_none_or(|transaction_type| transaction.transaction_type == transaction_type);

        matches_search && matches_category && matches_type
    }

    /// The matching transactions, in their original order.
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions
            .into_iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

/// The `search`, `category` and `type` query parameters for listing transactions.
///
/// Empty parameters are treated as missing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl Validate for TransactionQuery {
    type Output = TransactionFilter;

    const INVALID_MESSAGE: &'static str = "Invalid transaction filter";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let transaction_type = optional_text(self.transaction_type).and_then(|value| {
            parse::<TransactionType>(
                "type",
                &value,
                "Expected \"income\" or \"expense\"",
                &mut errors,
            )
        });

        if errors.is_empty() {
            Ok(TransactionFilter {
                search: optional_text(self.search),
                category: optional_text(self.category),
                transaction_type,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod filter_tests {
    use rust_decimal::Decimal;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        transaction::{NewTransaction, Transaction, TransactionType},
        validation::{FieldError, Validate},
    };

    use super::{TransactionFilter, TransactionQuery};

    fn transactions() -> Vec<Transaction> {
        [
            (TransactionType::Income, "Wheat harvest", "Crop Sales"),
            (TransactionType::Expense, "Nitrogen top dressing", "Fertilizer"),
            (TransactionType::Expense, "Tractor diesel", "Fuel"),
            (TransactionType::Income, "Wool clip", "Livestock Sales"),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (transaction_type, description, category))| {
            NewTransaction::build(
                transaction_type,
                description,
                Decimal::new(10, 0),
                category,
                date!(2024 - 01 - 05),
            )
            .into_transaction(index as i64 + 1, OffsetDateTime::UNIX_EPOCH)
        })
        .collect()
    }

    fn descriptions(transactions: &[Transaction]) -> Vec<&str> {
        transactions
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let got = TransactionFilter::default().apply(transactions());

        assert_eq!(got.len(), 4);
    }

    #[test]
    fn search_matches_description_or_category_ignoring_case() {
        let filter = TransactionFilter {
            search: Some("SALES".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter.apply(transactions())),
            vec!["Wheat harvest", "Wool clip"]
        );

        let filter = TransactionFilter {
            search: Some("diesel".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter.apply(transactions())),
            vec!["Tractor diesel"]
        );
    }

    #[test]
    fn category_must_match_exactly() {
        let filter = TransactionFilter {
            category: Some("Fuel".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            descriptions(&filter.apply(transactions())),
            vec!["Tractor diesel"]
        );

        let filter = TransactionFilter {
            category: Some("fuel".to_owned()),
            ..Default::default()
        };
        assert!(filter.apply(transactions()).is_empty());
    }

    #[test]
    fn criteria_are_combined() {
        let filter = TransactionFilter {
            search: Some("n".to_owned()),
            category: None,
            transaction_type: Some(TransactionType::Expense),
        };

        assert_eq!(
            descriptions(&filter.apply(transactions())),
            vec!["Nitrogen top dressing", "Tractor diesel"]
        );
    }

    #[test]
    fn blank_query_parameters_are_ignored() {
        let query = TransactionQuery {
            search: Some("  ".to_owned()),
            category: Some(String::new()),
            transaction_type: Some(String::new()),
        };

        assert_eq!(query.validate(), Ok(TransactionFilter::default()));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let query = TransactionQuery {
            transaction_type: Some("transfer".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.validate(),
            Err(vec![FieldError::new(
                "type",
                "Expected \"income\" or \"expense\""
            )])
        );
    }
}
