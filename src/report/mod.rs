//! Financial reports: summary totals, monthly totals, preset periods and CSV export.

mod endpoints;
mod export;
mod period;
mod summary;

pub use endpoints::{export_transactions_endpoint, get_summary_endpoint};
pub use export::write_transactions_csv;
pub use period::ReportPeriod;
pub use summary::{
    DateFilter, DateRangeQuery, MonthlyTotal, Summary, decimal_to_f64, monthly_totals, summarize,
};
