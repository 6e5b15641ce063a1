//! JSON API endpoints for categories.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, FieldError,
    category::{CategoryForm, CategoryStore},
    transaction::TransactionType,
    validation::{ValidJson, ValidQuery, Validate, optional_text},
};

/// The state needed by the category endpoints.
#[derive(Clone)]
pub struct CategoryState {
    /// The store that categories are read from and written to.
    pub category_store: Arc<dyn CategoryStore>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            category_store: state.category_store.clone(),
        }
    }
}

/// The query string for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Only list categories of this type. Empty means every category.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

impl Validate for CategoryQuery {
    type Output = Option<TransactionType>;

    const INVALID_MESSAGE: &'static str = "Invalid category type";

    fn validate(self) -> Result<Self::Output, Vec<FieldError>> {
        optional_text(self.category_type)
            .map(|category_type| category_type.parse::<TransactionType>())
            .transpose()
            .map_err(|error| vec![FieldError::new("type", &error.to_string())])
    }
}

/// List categories, optionally only those for income or expenses.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    ValidQuery(category_type): ValidQuery<CategoryQuery>,
) -> Response {
    let result = match category_type {
        None => state.category_store.get_all(),
        Some(category_type) => state.category_store.get_by_type(category_type),
    };

    match result {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => error.into_json_response("Failed to fetch categories"),
    }
}

/// Create a new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    ValidJson(new_category): ValidJson<CategoryForm>,
) -> Response {
    match state.category_store.create(new_category) {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => error.into_json_response("Failed to create category"),
    }
}
