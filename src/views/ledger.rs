//! The income and expenses pages.
//!
//! Both pages list the transactions of one type and offer a form for adding
//! another. The form only offers the categories of that type. The list can be
//! narrowed with the `search` and `category` query parameters.

use axum::extract::{Query, State};
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    category::Category,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_CONTAINER_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_decimal_currency, metric_card,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionFilter, TransactionType},
    validation::optional_text,
    views::{ViewState, htmx_handlers_script},
};

/// Payment methods suggested by the add transaction form.
const PAYMENT_METHODS: [&str; 4] = ["Cash", "Bank Transfer", "Card", "Cheque"];

/// The search form's query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// List income transactions with a form for recording a new one.
pub async fn get_income_page(
    State(state): State<ViewState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Markup, Error> {
    ledger_page(&state, TransactionType::Income, query)
}

/// List expense transactions with a form for recording a new one.
pub async fn get_expenses_page(
    State(state): State<ViewState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Markup, Error> {
    ledger_page(&state, TransactionType::Expense, query)
}

fn ledger_page(
    state: &ViewState,
    transaction_type: TransactionType,
    query: LedgerQuery,
) -> Result<Markup, Error> {
    let filter = TransactionFilter {
        search: optional_text(query.search),
        category: optional_text(query.category),
        transaction_type: Some(transaction_type),
    };

    let transactions = state
        .transaction_store
        .get_all()
        .inspect_err(|error| tracing::error!("could not get {transaction_type} transactions: {error}"))?;
    let transactions = filter.apply(transactions);

    let categories = state
        .category_store
        .get_by_type(transaction_type)
        .inspect_err(|error| tracing::error!("could not get {transaction_type} categories: {error}"))?;

    let today = OffsetDateTime::now_utc().date();

    Ok(ledger_view(
        transaction_type,
        &filter,
        &transactions,
        &categories,
        &today.to_string(),
    ))
}

struct LedgerText {
    title: &'static str,
    endpoint: &'static str,
    total_label: &'static str,
    form_heading: &'static str,
    empty_message: &'static str,
    no_matches_message: &'static str,
}

fn ledger_text(transaction_type: TransactionType) -> LedgerText {
    match transaction_type {
        TransactionType::Income => LedgerText {
            title: "Income",
            endpoint: endpoints::INCOME_VIEW,
            total_label: "Total Income",
            form_heading: "Add Income",
            empty_message: "No income recorded yet.",
            no_matches_message: "No income matches your search.",
        },
        TransactionType::Expense => LedgerText {
            title: "Expenses",
            endpoint: endpoints::EXPENSES_VIEW,
            total_label: "Total Expenses",
            form_heading: "Add Expense",
            empty_message: "No expenses recorded yet.",
            no_matches_message: "No expenses match your search.",
        },
    }
}

fn ledger_view(
    transaction_type: TransactionType,
    filter: &TransactionFilter,
    transactions: &[Transaction],
    categories: &[Category],
    today: &str,
) -> Markup {
    let text = ledger_text(transaction_type);
    let is_filtered = filter.search.is_some() || filter.category.is_some();
    let nav_bar = NavBar::new(text.endpoint).into_html();
    let total: Decimal = transactions.iter().map(|transaction| transaction.amount).sum();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-xl font-bold" { (text.title) }

                (metric_card(text.total_label, &total, "text-gray-900 dark:text-white"))

                (search_form(text.endpoint, filter, categories))

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment Method" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td colspan="6" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        @if is_filtered {
                                            (text.no_matches_message)
                                        } @else {
                                            (text.empty_message)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                (transaction_form(transaction_type, text.form_heading, categories, today))
            }
        }
    );

    base(text.title, &[htmx_handlers_script()], &content)
}

fn search_form(endpoint: &str, filter: &TransactionFilter, categories: &[Category]) -> Markup {
    html!(
        form
            id="transaction-search"
            method="get"
            action=(endpoint)
            class="flex flex-col gap-4 sm:flex-row sm:items-end"
        {
            div class="flex-1"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="search"
                    type="search"
                    name="search"
                    placeholder="Search transactions..."
                    value=[filter.search.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="filter-category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All Categories" }
                    @for category in categories {
                        option
                            value=(category.name)
                            selected[filter.category.as_deref() == Some(category.name.as_str())]
                        {
                            (category.name)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
            a href=(endpoint) class="text-sm text-blue-600 hover:underline dark:text-blue-500" { "Clear" }
        }
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class="px-6 py-4 font-medium text-gray-900 dark:text-white"
            {
                (transaction.description)
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                (transaction.payment_method.as_deref().unwrap_or("-"))
            }
            td class="px-6 py-4 text-right tabular-nums"
            {
                (format_decimal_currency(&transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (transaction.description)
                        "'? This cannot be undone."
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

fn transaction_form(
    transaction_type: TransactionType,
    heading: &str,
    categories: &[Category],
    today: &str,
) -> Markup {
    html!(
        section id="add-transaction" class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-lg font-semibold" { (heading) }

            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-ext="json-enc"
                hx-swap="none"
                data-reload-on-success="true"
                class="space-y-4"
            {
                input type="hidden" name="type" value=(transaction_type.as_str());

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        id="description"
                        type="text"
                        name="description"
                        placeholder="e.g. Wheat harvest"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Select a category" }
                        @for category in categories {
                            option value=(category.name) { (category.name) }
                        }
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        id="date"
                        type="date"
                        name="date"
                        value=(today)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="paymentMethod" class=(FORM_LABEL_STYLE) { "Payment Method" }
                    select id="paymentMethod" name="paymentMethod" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" { "Not specified" }
                        @for method in PAYMENT_METHODS {
                            option value=(method) { (method) }
                        }
                    }
                }

                div
                {
                    label for="receiptUrl" class=(FORM_LABEL_STYLE) { "Receipt Link" }
                    input
                        id="receiptUrl"
                        type="url"
                        name="receiptUrl"
                        placeholder="https://"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="receiptFilename" class=(FORM_LABEL_STYLE) { "Receipt File Name" }
                    input
                        id="receiptFilename"
                        type="text"
                        name="receiptFilename"
                        placeholder="e.g. fuel-receipt.pdf"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                p data-form-error="true" class="text-sm text-red-600 dark:text-red-400" {}

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (heading) }
            }
        }
    )
}

#[cfg(test)]
mod ledger_tests {
    use std::sync::Arc;

    use axum::{
        extract::{FromRef, Query, State},
        response::IntoResponse,
    };
    use rust_decimal::Decimal;
    use scraper::{ElementRef, Html, Selector};
    use time::macros::date;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_field, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            parse_html_document, select_text,
        },
        transaction::{MemoryTransactionStore, NewTransaction, TransactionStore, TransactionType},
        views::ViewState,
    };

    use super::{LedgerQuery, get_expenses_page, get_income_page};

    fn state_with_sample_transactions() -> (ViewState, i64) {
        let store = MemoryTransactionStore::new();
        store
            .create(NewTransaction::build(
                TransactionType::Income,
                "Wheat harvest",
                Decimal::new(100, 0),
                "Crop Sales",
                date!(2024 - 01 - 05),
            ))
            .unwrap();
        let expense = store
            .create(
                NewTransaction::build(
                    TransactionType::Expense,
                    "Nitrogen",
                    Decimal::new(4000, 2),
                    "Fertilizer",
                    date!(2024 - 01 - 10),
                )
                .payment_method(Some("Cash")),
            )
            .unwrap();
        store
            .create(NewTransaction::build(
                TransactionType::Expense,
                "Tractor diesel",
                Decimal::new(2525, 2),
                "Fuel",
                date!(2024 - 01 - 12),
            ))
            .unwrap();

        let state = ViewState::from_ref(&AppState {
            transaction_store: Arc::new(store),
            ..AppState::in_memory()
        });

        (state, expense.id)
    }

    fn no_search() -> Query<LedgerQuery> {
        Query(LedgerQuery::default())
    }

    fn search(search: &str, category: &str) -> Query<LedgerQuery> {
        Query(LedgerQuery {
            search: Some(search.to_owned()),
            category: Some(category.to_owned()),
        })
    }

    #[track_caller]
    fn must_get<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
    }

    #[tokio::test]
    async fn expenses_page_lists_only_expenses() {
        let (state, expense_id) = state_with_sample_transactions();

        let response = get_expenses_page(State(state), no_search())
            .await
            .into_response();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = select_text(&html, "tbody tr td:nth-child(2)");
        assert_eq!(rows, vec!["Tractor diesel", "Nitrogen"]);
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(4)"),
            vec!["-", "Cash"]
        );
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(5)"),
            vec!["$25.25", "$40.00"]
        );

        let selector = Selector::parse("tbody button").unwrap();
        let delete_urls: Vec<&str> = html
            .select(&selector)
            .filter_map(|button| button.value().attr("hx-delete"))
            .collect();
        assert_eq!(delete_urls.len(), 2);
        assert!(delete_urls.contains(&format_endpoint(endpoints::TRANSACTION, expense_id).as_str()));
    }

    #[tokio::test]
    async fn form_posts_to_transactions_api() {
        let (state, _) = state_with_sample_transactions();

        let response = get_income_page(State(state), no_search())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let form = must_get(&html, "#add-transaction form");
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_eq!(form.value().attr("hx-ext"), Some("json-enc"));
        assert_form_field(&form, "description", true);
        assert_form_field(&form, "amount", true);
        assert_form_field(&form, "category", true);
        assert_form_field(&form, "date", true);
        assert_form_field(&form, "paymentMethod", false);

        let selector = Selector::parse("input[name='type']").unwrap();
        let type_input = form.select(&selector).next().expect("No type input");
        assert_eq!(type_input.value().attr("value"), Some("income"));
    }

    #[tokio::test]
    async fn form_has_optional_receipt_fields() {
        let (state, _) = state_with_sample_transactions();

        let response = get_expenses_page(State(state), no_search())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let form = must_get(&html, "#add-transaction form");
        assert_form_field(&form, "receiptUrl", false);
        assert_form_field(&form, "receiptFilename", false);
        let receipt_url = must_get(&html, "#add-transaction input[name='receiptUrl']");
        assert_eq!(receipt_url.value().attr("type"), Some("url"));
    }

    #[tokio::test]
    async fn category_select_only_lists_matching_type() {
        let (state, _) = state_with_sample_transactions();

        let response = get_income_page(State(state), no_search())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let options = select_text(&html, "#add-transaction select[name='category'] option");
        assert_eq!(
            options,
            vec![
                "Select a category",
                "Crop Sales",
                "Livestock Sales",
                "Subsidies",
                "Grants",
                "Other Income"
            ]
        );
    }

    #[tokio::test]
    async fn search_form_gets_the_same_page() {
        let (state, _) = state_with_sample_transactions();

        let response = get_expenses_page(State(state), no_search())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        let form = must_get(&html, "form#transaction-search");
        assert_eq!(form.value().attr("method"), Some("get"));
        assert_eq!(form.value().attr("action"), Some(endpoints::EXPENSES_VIEW));
        assert_form_field(&form, "search", false);
        assert_form_field(&form, "category", false);
        let options = select_text(&html, "#transaction-search option");
        assert_eq!(options.first().map(String::as_str), Some("All Categories"));
        assert!(options.contains(&"Fertilizer".to_owned()));
        assert!(!options.contains(&"Crop Sales".to_owned()));
    }

    #[tokio::test]
    async fn search_matches_description_or_category() {
        let (state, _) = state_with_sample_transactions();

        let by_description = get_expenses_page(State(state.clone()), search("DIESEL", ""))
            .await
            .into_response();
        let by_category = get_expenses_page(State(state), search("fert", ""))
            .await
            .into_response();

        let html = parse_html_document(by_description).await;
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            vec!["Tractor diesel"]
        );
        assert_eq!(select_text(&html, "[data-metric]"), vec!["$25.25"]);
        let search_input = must_get(&html, "input[name='search']");
        assert_eq!(search_input.value().attr("value"), Some("DIESEL"));

        let html = parse_html_document(by_category).await;
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            vec!["Nitrogen"]
        );
    }

    #[tokio::test]
    async fn category_filter_keeps_its_selection() {
        let (state, _) = state_with_sample_transactions();

        let response = get_expenses_page(State(state), search("", "Fuel"))
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            vec!["Tractor diesel"]
        );
        assert_eq!(
            select_text(&html, "#transaction-search option[selected]"),
            vec!["Fuel"]
        );
    }

    #[tokio::test]
    async fn search_never_shows_the_other_type() {
        let (state, _) = state_with_sample_transactions();

        let response = get_income_page(State(state), search("e", ""))
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "tbody tr td:nth-child(2)"),
            vec!["Wheat harvest"]
        );
    }

    #[tokio::test]
    async fn search_without_matches_says_so() {
        let (state, _) = state_with_sample_transactions();

        let response = get_expenses_page(State(state), search("hay", ""))
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "tbody td[colspan='6']"),
            vec!["No expenses match your search."]
        );
    }

    #[tokio::test]
    async fn empty_page_shows_message() {
        let state = ViewState::from_ref(&AppState::in_memory());

        let response = get_income_page(State(state), no_search())
            .await
            .into_response();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "tbody td[colspan='6']"),
            vec!["No income recorded yet."]
        );
    }
}
