//! JSON API endpoints for transactions.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, json_error,
    transaction::{TransactionForm, TransactionPatchForm, TransactionQuery, TransactionStore},
    validation::{RecordId, ValidJson, ValidQuery},
};

const NOT_FOUND_MESSAGE: &str = "Transaction not found";

/// The state needed by the transaction endpoints.
#[derive(Clone)]
pub struct TransactionState {
    /// The store that transactions are read from and written to.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// List transactions, most recently created first.
///
/// The optional `search`, `category` and `type` query parameters narrow the list.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    ValidQuery(filter): ValidQuery<TransactionQuery>,
) -> Response {
    match state.transaction_store.get_all() {
        Ok(transactions) => Json(filter.apply(transactions)).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions"),
    }
}

/// Get a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    RecordId(id): RecordId,
) -> Response {
    match state.transaction_store.get(id) {
        Ok(Some(transaction)) => Json(transaction).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to fetch transaction"),
    }
}

/// Record a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    ValidJson(new_transaction): ValidJson<TransactionForm>,
) -> Response {
    match state.transaction_store.create(new_transaction) {
        Ok(transaction) => {
            tracing::info!(
                "created {} transaction {} for {}",
                transaction.transaction_type,
                transaction.id,
                transaction.amount
            );
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => error.into_json_response("Failed to create transaction"),
    }
}

/// Update the supplied fields of a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<TransactionPatchForm>,
) -> Response {
    match state.transaction_store.update(id, patch) {
        Ok(Some(transaction)) => Json(transaction).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to update transaction"),
    }
}

/// Delete a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    RecordId(id): RecordId,
) -> Response {
    match state.transaction_store.delete(id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to delete transaction"),
    }
}
