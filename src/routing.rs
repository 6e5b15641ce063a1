//! Application router configuration for the JSON API and the HTML pages.

use axum::{Router, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    inventory::{
        create_inventory_item_endpoint, delete_inventory_item_endpoint, get_inventory_endpoint,
        get_inventory_item_endpoint, update_inventory_item_endpoint,
    },
    not_found::get_404_not_found,
    report::{export_transactions_endpoint, get_summary_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    views::{
        get_dashboard_page, get_expenses_page, get_income_page, get_inventory_page,
        get_reports_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::INVENTORY_VIEW, get(get_inventory_page));

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::CATEGORIES_API,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::INVENTORY_API,
            get(get_inventory_endpoint).post(create_inventory_item_endpoint),
        )
        .route(
            endpoints::INVENTORY_ITEM,
            get(get_inventory_item_endpoint)
                .put(update_inventory_item_endpoint)
                .delete(delete_inventory_item_endpoint),
        )
        .route(endpoints::SUMMARY_API, get(get_summary_endpoint))
        .route(
            endpoints::EXPORT_TRANSACTIONS,
            get(export_transactions_endpoint),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
