//! Server-rendered HTML pages.
//!
//! Pages read straight from the stores and post changes back through the JSON API with htmx.

use std::sync::Arc;

use axum::extract::FromRef;
use maud::PreEscaped;

use crate::{
    AppState, category::CategoryStore, html::HeadElement, inventory::InventoryStore,
    transaction::TransactionStore,
};

mod charts;
mod dashboard;
mod inventory;
mod ledger;
mod reports;

pub use dashboard::get_dashboard_page;
pub use inventory::get_inventory_page;
pub use ledger::{get_expenses_page, get_income_page};
pub use reports::get_reports_page;

/// The state needed by the page handlers.
#[derive(Clone)]
pub struct ViewState {
    /// The store that transactions are read from.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The store that categories are read from for the add transaction forms.
    pub category_store: Arc<dyn CategoryStore>,
    /// The store that inventory items are read from.
    pub inventory_store: Arc<dyn InventoryStore>,
}

impl FromRef<AppState> for ViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            category_store: state.category_store.clone(),
            inventory_store: state.inventory_store.clone(),
        }
    }
}

/// Handles the outcome of the htmx requests made by the pages.
///
/// Delete buttons marked with `data-delete-row` remove their table row once the
/// API confirms the deletion. Forms marked with `data-reload-on-success` reload
/// the page after a successful submit and otherwise show the API's error
/// message in their `[data-form-error]` element.
pub(super) fn htmx_handlers_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(
        r#"document.addEventListener('htmx:afterRequest', function(event) {
    const element = event.detail.elt;

    if (event.detail.successful) {
        if (element.dataset.deleteRow) {
            element.closest('tr').remove();
        }
        if (element.dataset.reloadOnSuccess) {
            window.location.reload();
        }
        return;
    }

    const errorElement = element.querySelector('[data-form-error]');
    if (!errorElement) {
        return;
    }

    try {
        const body = JSON.parse(event.detail.xhr.responseText);
        const details = (body.errors || []).map((error) => error.field ? `${error.field}: ${error.message}` : error.message);
        errorElement.textContent = [body.message, ...details].join('. ');
    } catch {
        errorElement.textContent = 'Something went wrong, please try again.';
    }
});"#
            .to_owned(),
    ))
}
