//! Derives totals from transactions on demand.
//!
//! Amounts are summed as [Decimal]s so totals are exact. They are only
//! converted to floating point when serialized for the API and charts.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize, Serializer};
use time::Date;

use crate::{
    transaction::{Transaction, TransactionType},
    validation::{FieldError, Validate, date, optional_text},
};

/// Inclusive date bounds for reports and exports.
///
/// The bounds only take effect when both are given; a lone start or end
/// date is ignored. A filter whose start is after its end matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    /// The earliest date to include.
    pub start: Option<Date>,
    /// The latest date to include.
    pub end: Option<Date>,
}

impl DateFilter {
    /// Whether `date` falls within the bounds.
    pub fn contains(&self, date: Date) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => true,
        }
    }

    /// The transactions whose date falls within the bounds, in their original order.
    pub fn apply<'a>(
        &self,
        transactions: &'a [Transaction],
    ) -> impl Iterator<Item = &'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.contains(transaction.date))
    }
}

/// The `startDate` and `endDate` query parameters.
///
/// Empty parameters are treated as missing.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Validate for DateRangeQuery {
    type Output = DateFilter;

    const INVALID_MESSAGE: &'static str = "Invalid date range";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let start = optional_text(self.start_date)
            .and_then(|value| date("startDate", &value, &mut errors));
        let end =
            optional_text(self.end_date).and_then(|value| date("endDate", &value, &mut errors));

        if errors.is_empty() {
            Ok(DateFilter { start, end })
        } else {
            Err(errors)
        }
    }
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income.
    #[serde(serialize_with = "serialize_as_number")]
    pub total_income: Decimal,
    /// The sum of all expenses.
    #[serde(serialize_with = "serialize_as_number")]
    pub total_expenses: Decimal,
    /// Always `total_income - total_expenses`.
    #[serde(serialize_with = "serialize_as_number")]
    pub net_profit: Decimal,
    /// Expense totals keyed by category name.
    #[serde(serialize_with = "serialize_values_as_numbers")]
    pub expenses_by_category: BTreeMap<String, Decimal>,
    /// Income totals keyed by category name.
    #[serde(serialize_with = "serialize_values_as_numbers")]
    pub income_by_category: BTreeMap<String, Decimal>,
    /// How many transactions were included.
    pub transaction_count: usize,
}

/// Convert a decimal to the nearest float for display.
pub fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn serialize_as_number<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(decimal_to_f64(value))
}

fn serialize_values_as_numbers<S: Serializer>(
    map: &BTreeMap<String, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(map.iter().map(|(key, value)| (key, decimal_to_f64(value))))
}

fn add_to_category(totals: &mut BTreeMap<String, Decimal>, category: &str, amount: Decimal) {
    *totals.entry(category.to_owned()).or_default() += amount;
}

/// Total the transactions that pass `filter`.
pub fn summarize(transactions: &[Transaction], filter: &DateFilter) -> Summary {
    let mut summary = Summary::default();

    for transaction in filter.apply(transactions) {
        summary.transaction_count += 1;

        match transaction.transaction_type {
            TransactionType::Income => {
                summary.total_income += transaction.amount;
                add_to_category(
                    &mut summary.income_by_category,
                    &transaction.category,
                    transaction.amount,
                );
            }
            TransactionType::Expense => {
                summary.total_expenses += transaction.amount;
                add_to_category(
                    &mut summary.expenses_by_category,
                    &transaction.category,
                    transaction.amount,
                );
            }
        }
    }

    summary.net_profit = summary.total_income - summary.total_expenses;

    summary
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Group the transactions that pass `filter` by calendar month, oldest month first.
///
/// Months without any transactions are left out.
pub fn monthly_totals(transactions: &[Transaction], filter: &DateFilter) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<Date, MonthlyTotal> = BTreeMap::new();

    for transaction in filter.apply(transactions) {
        let month = first_of_month(transaction.date);
        let total = totals.entry(month).or_insert(MonthlyTotal {
            month,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        });

        match transaction.transaction_type {
            TransactionType::Income => total.income += transaction.amount,
            TransactionType::Expense => total.expenses += transaction.amount,
        }
    }

    totals.into_values().collect()
}

fn first_of_month(date: Date) -> Date {
    // Day 1 exists in every month.
    date.replace_day(1).unwrap_or(date)
}

#[cfg(test)]
mod summary_tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        transaction::{NewTransaction, Transaction, TransactionType},
        validation::{FieldError, Validate},
    };

    use super::{DateFilter, DateRangeQuery, monthly_totals, summarize};

    fn transaction(
        id: i64,
        transaction_type: TransactionType,
        amount: i64,
        category: &str,
        date: time::Date,
    ) -> Transaction {
        NewTransaction::build(
            transaction_type,
            "test",
            Decimal::new(amount * 100, 2),
            category,
            date,
        )
        .into_transaction(id, OffsetDateTime::UNIX_EPOCH)
    }

    fn example_transactions() -> Vec<Transaction> {
        vec![
            transaction(
                1,
                TransactionType::Income,
                100,
                "Crop Sales",
                date!(2024 - 01 - 05),
            ),
            transaction(
                2,
                TransactionType::Expense,
                40,
                "Fertilizer",
                date!(2024 - 01 - 10),
            ),
        ]
    }

    #[test]
    fn summarizes_income_and_expenses() {
        let summary = summarize(&example_transactions(), &DateFilter::default());

        assert_eq!(summary.total_income, Decimal::new(100, 0));
        assert_eq!(summary.total_expenses, Decimal::new(40, 0));
        assert_eq!(summary.net_profit, Decimal::new(60, 0));
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "totalIncome": 100.0,
                "totalExpenses": 40.0,
                "netProfit": 60.0,
                "expensesByCategory": {"Fertilizer": 40.0},
                "incomeByCategory": {"Crop Sales": 100.0},
                "transactionCount": 2
            })
        );
    }

    #[test]
    fn net_profit_is_income_minus_expenses() {
        let mut transactions = example_transactions();
        transactions.push(transaction(
            3,
            TransactionType::Expense,
            75,
            "Fuel",
            date!(2024 - 02 - 01),
        ));
        transactions.push(transaction(
            4,
            TransactionType::Income,
            12,
            "Grants",
            date!(2024 - 02 - 03),
        ));

        let summary = summarize(&transactions, &DateFilter::default());

        assert_eq!(
            summary.total_income - summary.total_expenses,
            summary.net_profit
        );
        assert_eq!(summary.net_profit, Decimal::new(-3, 0));
    }

    #[test]
    fn bounds_are_inclusive() {
        let transactions = example_transactions();
        let filter = DateFilter {
            start: Some(date!(2024 - 01 - 05)),
            end: Some(date!(2024 - 01 - 09)),
        };

        let summary = summarize(&transactions, &filter);

        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.total_income, Decimal::new(100, 0));
        assert_eq!(summary.total_expenses, Decimal::ZERO);
    }

    #[test]
    fn a_lone_bound_is_ignored() {
        let transactions = example_transactions();
        let start_only = DateRangeQuery {
            start_date: Some("2024-01-10".to_owned()),
            end_date: None,
        }
        .validate()
        .expect("valid query");
        let end_only = DateFilter {
            start: None,
            end: Some(date!(2024 - 01 - 05)),
        };

        for filter in [start_only, end_only] {
            let summary = summarize(&transactions, &filter);

            assert_eq!(summary.transaction_count, 2);
            assert_eq!(summary.total_income, Decimal::new(100, 0));
            assert_eq!(summary.total_expenses, Decimal::new(40, 0));
        }
    }

    #[test]
    fn start_after_end_is_empty() {
        let filter = DateFilter {
            start: Some(date!(2024 - 02 - 01)),
            end: Some(date!(2024 - 01 - 01)),
        };

        let summary = summarize(&example_transactions(), &filter);

        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert!(summary.expenses_by_category.is_empty());
    }

    #[test]
    fn groups_by_month() {
        let mut transactions = example_transactions();
        transactions.push(transaction(
            3,
            TransactionType::Expense,
            75,
            "Fuel",
            date!(2024 - 03 - 31),
        ));

        let got = monthly_totals(&transactions, &DateFilter::default());

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].month, date!(2024 - 01 - 01));
        assert_eq!(got[0].income, Decimal::new(100, 0));
        assert_eq!(got[0].expenses, Decimal::new(40, 0));
        assert_eq!(got[1].month, date!(2024 - 03 - 01));
        assert_eq!(got[1].income, Decimal::ZERO);
    }

    #[test]
    fn empty_query_parameters_are_ignored() {
        let query = DateRangeQuery {
            start_date: Some(String::new()),
            end_date: Some("2024-01-31".to_owned()),
        };

        let got = query.validate();

        assert_eq!(
            got,
            Ok(DateFilter {
                start: None,
                end: Some(date!(2024 - 01 - 31))
            })
        );
    }

    #[test]
    fn malformed_query_parameters_are_rejected() {
        let query = DateRangeQuery {
            start_date: Some("January".to_owned()),
            end_date: None,
        };

        let got = query.validate();

        assert_eq!(
            got,
            Err(vec![FieldError::new(
                "startDate",
                "Expected a date in the format YYYY-MM-DD"
            )])
        );
    }
}
