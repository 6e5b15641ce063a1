//! Farm Ledger is a bookkeeping web app for small farms.
//!
//! Users record income and expense transactions, group them into categories,
//! keep track of inventory, and view summaries, charts and CSV exports of
//! their finances.
//!
//! This library provides a JSON API over a swappable storage backend
//! (SQLite or in-memory) and a handful of server-rendered HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod html;
mod inventory;
mod logging;
mod memory_table;
mod navigation;
mod not_found;
mod report;
mod routing;
mod transaction;
mod validation;
mod views;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use validation::FieldError;

use crate::{html::render_internal_server_error, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request body, path or query that failed validation.
    ///
    /// `message` is a short summary such as "Invalid transaction data" and
    /// `errors` lists the problems with individual fields.
    #[error("{message}")]
    InvalidInput {
        /// A summary of what was being validated.
        message: &'static str,
        /// The problems found with individual fields.
        errors: Vec<FieldError>,
    },

    /// The requested resource was not found.
    ///
    /// Stores signal missing records with `Option` and `bool`, so this error
    /// is only produced by page handlers and path lookups.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the lock on a store.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while writing transactions as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

/// The JSON body sent to API clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

/// Create a JSON error response with `status` and `message`.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message,
            errors: None,
        }),
    )
        .into_response()
}

impl Error {
    /// Convert the error into a JSON response for an API client.
    ///
    /// Validation errors are returned with their field-level details.
    /// Anything unexpected is logged and replaced with `failure_message` so
    /// that internal details are not leaked to the client.
    pub(crate) fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidInput { message, errors } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    message,
                    errors: Some(&errors),
                }),
            )
                .into_response(),
            Error::NotFound => json_error(StatusCode::NOT_FOUND, "Not found"),
            error => {
                tracing::error!("{failure_message}: {error}");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidInput { message, errors } => {
                let details = errors
                    .iter()
                    .map(|error| error.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                html::render_bad_request(message, &details)
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{Error, FieldError, test_utils::parse_json};

    #[tokio::test]
    async fn invalid_input_has_field_details() {
        let error = Error::InvalidInput {
            message: "Invalid transaction data",
            errors: vec![FieldError::new("amount", "Required")],
        };

        let response = error.into_json_response("Failed to create transaction");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json(response).await;
        assert_eq!(
            body,
            json!({
                "message": "Invalid transaction data",
                "errors": [{"field": "amount", "message": "Required"}]
            })
        );
    }

    #[tokio::test]
    async fn unexpected_errors_do_not_leak_details() {
        let error = Error::SqlError(rusqlite::Error::InvalidQuery);

        let response = error.into_json_response("Failed to fetch transactions");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json(response).await;
        assert_eq!(body, json!({"message": "Failed to fetch transactions"}));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
