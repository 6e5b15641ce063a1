//! The inventory page.

use axum::extract::State;
use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, count_card, format_decimal_currency, metric_card,
    },
    inventory::InventoryItem,
    navigation::NavBar,
    views::{ViewState, htmx_handlers_script},
};

/// List the inventory with a form for adding items.
pub async fn get_inventory_page(State(state): State<ViewState>) -> Result<Markup, Error> {
    let items = state
        .inventory_store
        .get_all()
        .inspect_err(|error| tracing::error!("could not get inventory items: {error}"))?;

    Ok(inventory_view(&items))
}

/// The sum of the item values. Items without a value count as zero.
fn total_value(items: &[InventoryItem]) -> Decimal {
    items.iter().filter_map(|item| item.value).sum()
}

fn inventory_view(items: &[InventoryItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::INVENTORY_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Inventory" }

                section class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    (count_card("Total Items", items.len(), "text-blue-600 dark:text-blue-400"))
                    (metric_card("Total Value", &total_value(items), "text-green-600 dark:text-green-400"))
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                                th scope="col" class="px-6 py-3 text-right" { "Quantity" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Unit" }
                                th scope="col" class="px-6 py-3 text-right" { "Value" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Last Updated" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for item in items {
                                (inventory_row(item))
                            }

                            @if items.is_empty() {
                                tr
                                {
                                    td colspan="6" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No inventory items yet."
                                    }
                                }
                            }
                        }
                    }
                }

                (inventory_form())
            }
        }
    );

    base("Inventory", &[htmx_handlers_script()], &content)
}

fn inventory_row(item: &InventoryItem) -> Markup {
    let delete_url = format_endpoint(endpoints::INVENTORY_ITEM, item.id);
    let last_updated = item.last_updated.date().to_string();

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (item.name)
            }
            td class="px-6 py-4 text-right tabular-nums" { (item.quantity) }
            td class=(TABLE_CELL_STYLE) { (item.unit) }
            td class="px-6 py-4 text-right tabular-nums"
            {
                @match &item.value {
                    Some(value) => { (format_decimal_currency(value)) }
                    None => { "-" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(last_updated) { (last_updated) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (item.name) "'? This cannot be undone."
                    }
                    hx-swap="none"
                    data-delete-row="true"
                {
                    "Delete"
                }
            }
        }
    )
}

fn inventory_form() -> Markup {
    html!(
        section id="add-item" class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-lg font-semibold" { "Add Item" }

            form
                hx-post=(endpoints::INVENTORY_API)
                hx-ext="json-enc"
                hx-swap="none"
                data-reload-on-success="true"
                class="space-y-4"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }
                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="e.g. Wheat seed"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }
                        input
                            id="quantity"
                            type="number"
                            name="quantity"
                            step="0.01"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="unit" class=(FORM_LABEL_STYLE) { "Unit" }
                        input
                            id="unit"
                            type="text"
                            name="unit"
                            placeholder="e.g. kg"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="value" class=(FORM_LABEL_STYLE) { "Value (optional)" }
                    input
                        id="value"
                        type="number"
                        name="value"
                        step="0.01"
                        min="0"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                p data-form-error="true" class="text-sm text-red-600 dark:text-red-400" {}

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Item" }
            }
        }
    )
}
