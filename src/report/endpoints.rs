//! JSON summary and CSV export endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    report::{DateRangeQuery, summarize, write_transactions_csv},
    transaction::TransactionStore,
    validation::ValidQuery,
};

/// The state needed by the report endpoints.
#[derive(Clone)]
pub struct ReportState {
    /// The store that transactions are read from.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Total income and expenses between the optional `startDate` and `endDate`.
pub async fn get_summary_endpoint(
    State(state): State<ReportState>,
    ValidQuery(filter): ValidQuery<DateRangeQuery>,
) -> Response {
    match state.transaction_store.get_all() {
        Ok(transactions) => Json(summarize(&transactions, &filter)).into_response(),
        Err(error) => error.into_json_response("Failed to generate report"),
    }
}

/// Download the transactions between the optional `startDate` and `endDate` as a CSV file.
pub async fn export_transactions_endpoint(
    State(state): State<ReportState>,
    ValidQuery(filter): ValidQuery<DateRangeQuery>,
) -> Response {
    let csv = state
        .transaction_store
        .get_all()
        .and_then(|transactions| write_transactions_csv(filter.apply(&transactions)));

    match csv {
        Ok(csv) => (
            [
                (CONTENT_TYPE, "text/csv"),
                (CONTENT_DISPOSITION, "attachment; filename=transactions.csv"),
            ],
            csv,
        )
            .into_response(),
        Err(error) => error.into_json_response("Failed to export transactions"),
    }
}

#[cfg(test)]
mod report_endpoint_tests {
    use std::sync::Arc;

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::transaction::{
        MemoryTransactionStore, NewTransaction, TransactionStore, TransactionType,
    };

    use super::{ReportState, export_transactions_endpoint, get_summary_endpoint};

    fn get_test_server() -> TestServer {
        let store = MemoryTransactionStore::new();
        store
            .create(NewTransaction::build(
                TransactionType::Income,
                "Wheat harvest",
                Decimal::new(10000, 2),
                "Crop Sales",
                date!(2024 - 01 - 05),
            ))
            .unwrap();
        store
            .create(
                NewTransaction::build(
                    TransactionType::Expense,
                    "Nitrogen",
                    Decimal::new(4000, 2),
                    "Fertilizer",
                    date!(2024 - 01 - 10),
                )
                .payment_method(Some("Card")),
            )
            .unwrap();
        store
            .create(NewTransaction::build(
                TransactionType::Expense,
                "Diesel",
                Decimal::new(2525, 2),
                "Fuel",
                date!(2024 - 02 - 02),
            ))
            .unwrap();

        let state = ReportState {
            transaction_store: Arc::new(store),
        };
        let app = Router::new()
            .route("/api/reports/summary", get(get_summary_endpoint))
            .route("/api/export/transactions", get(export_transactions_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn summary_of_january() {
        let server = get_test_server();

        let response = server
            .get("/api/reports/summary")
            .add_query_param("startDate", "2024-01-01")
            .add_query_param("endDate", "2024-01-31")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalIncome": 100.0,
            "totalExpenses": 40.0,
            "netProfit": 60.0,
            "expensesByCategory": {"Fertilizer": 40.0},
            "incomeByCategory": {"Crop Sales": 100.0},
            "transactionCount": 2
        }));
    }

    #[tokio::test]
    async fn summary_without_range_includes_everything() {
        let server = get_test_server();

        let body: Value = server
            .get("/api/reports/summary?startDate=&endDate=")
            .await
            .json();

        assert_eq!(body["transactionCount"], 3);
        assert_eq!(body["totalExpenses"], 65.25);
    }

    #[tokio::test]
    async fn summary_with_bad_date_is_bad_request() {
        let server = get_test_server();

        let response = server.get("/api/reports/summary?endDate=31-01-2024").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"][0]["field"], "endDate");
    }

    #[tokio::test]
    async fn export_is_a_csv_attachment() {
        let server = get_test_server();

        let response = server.get("/api/export/transactions").await;

        response.assert_status_ok();
        response.assert_header("content-type", "text/csv");
        response.assert_header(
            "content-disposition",
            "attachment; filename=transactions.csv",
        );
        let text = response.text();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Type,Description,Category,Amount,Payment Method")
        );
        assert_eq!(lines.next(), Some("2024-02-02,expense,Diesel,Fuel,25.25,"));
    }

    #[tokio::test]
    async fn export_rows_match_summary_count() {
        let server = get_test_server();

        let summary: Value = server
            .get("/api/reports/summary?startDate=2024-01-06&endDate=2024-12-31")
            .await
            .json();
        let csv = server
            .get("/api/export/transactions?startDate=2024-01-06&endDate=2024-12-31")
            .await
            .text();

        assert_eq!(summary["transactionCount"], 2);
        assert_eq!(csv.lines().count() - 1, 2);
    }

    #[tokio::test]
    async fn lone_start_date_does_not_filter() {
        let server = get_test_server();

        let summary: Value = server
            .get("/api/reports/summary?startDate=2024-01-06")
            .await
            .json();
        let csv = server
            .get("/api/export/transactions?endDate=2024-01-06")
            .await
            .text();

        assert_eq!(summary["transactionCount"], 3);
        assert_eq!(summary["totalIncome"], 100.0);
        assert_eq!(csv.lines().count() - 1, 3);
    }

    #[tokio::test]
    async fn repeated_date_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get("/api/reports/summary?startDate=2024-01-01&startDate=2024-02-01")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid date range");
        assert_eq!(body["errors"][0]["field"], "startDate");
    }

    #[tokio::test]
    async fn export_with_bad_date_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get("/api/export/transactions?endDate=2024-01-01&endDate=2024-02-01")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid date range");
    }

    #[tokio::test]
    async fn reversed_range_is_empty() {
        let server = get_test_server();

        let summary: Value = server
            .get("/api/reports/summary?startDate=2024-03-01&endDate=2024-01-01")
            .await
            .json();

        assert_eq!(summary["transactionCount"], 0);
        assert_eq!(summary["netProfit"], 0.0);
    }
}
