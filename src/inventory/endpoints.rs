//! JSON API endpoints for inventory items.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    inventory::{InventoryForm, InventoryPatchForm, InventoryStore},
    json_error,
    validation::{RecordId, ValidJson},
};

const NOT_FOUND_MESSAGE: &str = "Inventory item not found";

/// The state needed by the inventory endpoints.
#[derive(Clone)]
pub struct InventoryState {
    /// The store that inventory items are read from and written to.
    pub inventory_store: Arc<dyn InventoryStore>,
}

impl FromRef<AppState> for InventoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            inventory_store: state.inventory_store.clone(),
        }
    }
}

/// List every inventory item.
pub async fn get_inventory_endpoint(State(state): State<InventoryState>) -> Response {
    match state.inventory_store.get_all() {
        Ok(items) => Json(items).into_response(),
        Err(error) => error.into_json_response("Failed to fetch inventory items"),
    }
}

/// Get a single inventory item by its ID.
pub async fn get_inventory_item_endpoint(
    State(state): State<InventoryState>,
    RecordId(id): RecordId,
) -> Response {
    match state.inventory_store.get(id) {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to fetch inventory item"),
    }
}

/// Add an item to the inventory.
pub async fn create_inventory_item_endpoint(
    State(state): State<InventoryState>,
    ValidJson(new_item): ValidJson<InventoryForm>,
) -> Response {
    match state.inventory_store.create(new_item) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(error) => error.into_json_response("Failed to create inventory item"),
    }
}

/// Update the supplied fields of an inventory item.
pub async fn update_inventory_item_endpoint(
    State(state): State<InventoryState>,
    RecordId(id): RecordId,
    ValidJson(patch): ValidJson<InventoryPatchForm>,
) -> Response {
    match state.inventory_store.update(id, patch) {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to update inventory item"),
    }
}

/// Remove an item from the inventory.
pub async fn delete_inventory_item_endpoint(
    State(state): State<InventoryState>,
    RecordId(id): RecordId,
) -> Response {
    match state.inventory_store.delete(id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
        Err(error) => error.into_json_response("Failed to delete inventory item"),
    }
}

#[cfg(test)]
mod inventory_endpoint_tests {
    use std::sync::Arc;

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::inventory::MemoryInventoryStore;

    use super::{
        InventoryState, create_inventory_item_endpoint, delete_inventory_item_endpoint,
        get_inventory_endpoint, get_inventory_item_endpoint, update_inventory_item_endpoint,
    };

    fn get_test_server() -> TestServer {
        let state = InventoryState {
            inventory_store: Arc::new(MemoryInventoryStore::new()),
        };
        let app = Router::new()
            .route(
                "/api/inventory",
                get(get_inventory_endpoint).post(create_inventory_item_endpoint),
            )
            .route(
                "/api/inventory/{id}",
                get(get_inventory_item_endpoint)
                    .put(update_inventory_item_endpoint)
                    .delete(delete_inventory_item_endpoint),
            )
            .with_state(state);

        TestServer::new(app)
    }

    fn diesel() -> Value {
        json!({"name": "Diesel", "quantity": "200", "unit": "litres", "value": 340})
    }

    #[tokio::test]
    async fn create_returns_created_item() {
        let server = get_test_server();

        let response = server.post("/api/inventory").json(&diesel()).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["id"], 1);
        assert_eq!(body["quantity"], "200.00");
        assert_eq!(body["value"], "340.00");
        assert!(body["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn create_with_blank_name_is_bad_request() {
        let server = get_test_server();

        let response = server
            .post("/api/inventory")
            .json(&json!({"name": " ", "quantity": "1", "unit": "bag"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid inventory data");
        assert_eq!(body["errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn lists_items() {
        let server = get_test_server();
        server.post("/api/inventory").json(&diesel()).await;

        let body: Vec<Value> = server.get("/api/inventory").await.json();

        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["name"], "Diesel");
    }

    #[tokio::test]
    async fn update_changes_quantity() {
        let server = get_test_server();
        server.post("/api/inventory").json(&diesel()).await;

        let response = server
            .put("/api/inventory/1")
            .json(&json!({"quantity": 150}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["quantity"], "150.00");
        assert_eq!(body["unit"], "litres");
    }

    #[tokio::test]
    async fn missing_item_returns_not_found() {
        let server = get_test_server();

        let get_response = server.get("/api/inventory/3").await;
        let put_response = server
            .put("/api/inventory/3")
            .json(&json!({"unit": "kg"}))
            .await;
        let delete_response = server.delete("/api/inventory/3").await;

        get_response.assert_status(StatusCode::NOT_FOUND);
        put_response.assert_status(StatusCode::NOT_FOUND);
        delete_response.assert_status(StatusCode::NOT_FOUND);
        delete_response.assert_json(&json!({"message": "Inventory item not found"}));
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let server = get_test_server();
        server.post("/api/inventory").json(&diesel()).await;

        server
            .delete("/api/inventory/1")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
