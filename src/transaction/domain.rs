//! Core transaction domain types and request forms.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};

use crate::{
    database_id::DatabaseId,
    validation::{
        FieldError, Validate, date, decimal, deserialize_some, optional_text, parse,
        required_date, required_decimal, required_text, text,
    },
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. crop sales.
    Income,
    /// Money going out, e.g. fertilizer.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, CSV and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned when a string is neither "income" nor "expense".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected \"income\" or \"expense\" but got \"{0}\"")]
pub struct InvalidTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = InvalidTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money, with two decimal places.
    ///
    /// Amounts are non-negative by convention, the sign is given by `transaction_type`.
    pub amount: Decimal,
    /// The name of the category, e.g. "Fertilizer".
    ///
    /// This is expected to match a category of the same type, but it is not enforced.
    pub category: String,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// How the transaction was paid, e.g. "Cash".
    pub payment_method: Option<String>,
    /// Where a receipt for the transaction can be found.
    pub receipt_url: Option<String>,
    /// The original file name of the receipt.
    pub receipt_filename: Option<String>,
    /// When the transaction was recorded. Set by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to create a [Transaction].
///
/// The ID and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    pub payment_method: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_filename: Option<String>,
}

impl NewTransaction {
    /// Create a new transaction without a payment method or receipt.
    pub fn build(
        transaction_type: TransactionType,
        description: &str,
        amount: Decimal,
        category: &str,
        date: Date,
    ) -> Self {
        Self {
            transaction_type,
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            date,
            payment_method: None,
            receipt_url: None,
            receipt_filename: None,
        }
    }

    /// Set the payment method.
    pub fn payment_method(mut self, payment_method: Option<&str>) -> Self {
        self.payment_method = payment_method.map(str::to_owned);
        self
    }

    /// Set the receipt URL and file name.
    pub fn receipt(mut self, url: Option<&str>, filename: Option<&str>) -> Self {
        self.receipt_url = url.map(str::to_owned);
        self.receipt_filename = filename.map(str::to_owned);
        self
    }

    /// Attach the store-assigned fields.
    pub fn into_transaction(self, id: TransactionId, created_at: OffsetDateTime) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
            payment_method: self.payment_method,
            receipt_url: self.receipt_url,
            receipt_filename: self.receipt_filename,
            created_at,
        }
    }
}

/// A partial update for a [Transaction].
///
/// Fields that are `None` are left unchanged. For the optional fields,
/// `Some(None)` clears the existing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub transaction_type: Option<TransactionType>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<Date>,
    pub payment_method: Option<Option<String>>,
    pub receipt_url: Option<Option<String>>,
    pub receipt_filename: Option<Option<String>>,
}

impl TransactionPatch {
    /// Merge the supplied fields into `transaction`.
    ///
    /// The ID and creation time are never changed.
    pub fn apply_to(self, transaction: &mut Transaction) {
        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(payment_method) = self.payment_method {
            transaction.payment_method = payment_method;
        }
        if let Some(receipt_url) = self.receipt_url {
            transaction.receipt_url = receipt_url;
        }
        if let Some(receipt_filename) = self.receipt_filename {
            transaction.receipt_filename = receipt_filename;
        }
    }
}

const INVALID_TYPE_MESSAGE: &str = "Expected \"income\" or \"expense\"";

/// The JSON body for creating a transaction.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_filename: Option<String>,
}

impl Validate for TransactionForm {
    type Output = NewTransaction;

    const INVALID_MESSAGE: &'static str = "Invalid transaction data";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let transaction_type = match self.transaction_type {
            Some(value) => {
                parse::<TransactionType>("type", &value, INVALID_TYPE_MESSAGE, &mut errors)
            }
            None => {
                errors.push(FieldError::new("type", "Required"));
                None
            }
        };
        let description = required_text("description", self.description, &mut errors);
        let amount = required_decimal("amount", self.amount, &mut errors);
        let category = required_text("category", self.category, &mut errors);
        let date = required_date("date", self.date, &mut errors);

        match (transaction_type, description, amount, category, date) {
            (Some(transaction_type), Some(description), Some(amount), Some(category), Some(date))
                if errors.is_empty() =>
            {
                Ok(NewTransaction {
                    transaction_type,
                    description,
                    amount,
                    category,
                    date,
                    payment_method: optional_text(self.payment_method),
                    receipt_url: optional_text(self.receipt_url),
                    receipt_filename: optional_text(self.receipt_filename),
                })
            }
            _ => Err(errors),
        }
    }
}

/// The JSON body for partially updating a transaction.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatchForm {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub payment_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub receipt_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub receipt_filename: Option<Option<String>>,
}

impl Validate for TransactionPatchForm {
    type Output = TransactionPatch;

    const INVALID_MESSAGE: &'static str = "Invalid transaction data";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        let mut errors = Vec::new();

        let patch = TransactionPatch {
            transaction_type: self
                .transaction_type
                .and_then(|value| {
                    parse::<TransactionType>("type", &value, INVALID_TYPE_MESSAGE, &mut errors)
                }),
            description: self
                .description
                .and_then(|value| text("description", value, &mut errors)),
            amount: self
                .amount
                .and_then(|value| decimal("amount", &value, &mut errors)),
            category: self
                .category
                .and_then(|value| text("category", value, &mut errors)),
            date: self
                .date
                .and_then(|value| date("date", &value, &mut errors)),
            payment_method: self.payment_method.map(optional_text),
            receipt_url: self.receipt_url.map(optional_text),
            receipt_filename: self.receipt_filename.map(optional_text),
        };

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}
