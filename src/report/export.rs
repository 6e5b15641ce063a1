//! Writes transactions as CSV for spreadsheets.

use csv::{Terminator, WriterBuilder};

use crate::{Error, transaction::Transaction};

/// The first line of every export.
pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Type",
    "Description",
    "Category",
    "Amount",
    "Payment Method",
];

/// Write `transactions` as CSV, one row per transaction after the header.
///
/// Fields containing commas, quotes or line breaks are quoted. A missing
/// payment method is written as an empty field.
///
/// # Errors
/// Returns [Error::CsvError] if a row cannot be written.
pub fn write_transactions_csv<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for transaction in transactions {
        writer.write_record([
            transaction.date.to_string().as_str(),
            transaction.transaction_type.as_str(),
            transaction.description.as_str(),
            transaction.category.as_str(),
            transaction.amount.to_string().as_str(),
            transaction.payment_method.as_deref().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}
