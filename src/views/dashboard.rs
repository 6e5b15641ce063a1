//! The dashboard: headline figures, charts, recent activity and shortcuts.

use axum::extract::State;
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, format_decimal_currency, metric_card,
    },
    navigation::NavBar,
    report::{DateFilter, MonthlyTotal, Summary, monthly_totals, summarize},
    transaction::{Transaction, TransactionType},
    views::{
        ViewState,
        charts::{
            ECHARTS_SCRIPT, PageChart, charts_script, charts_view, expense_breakdown_chart,
            income_expense_chart,
        },
    },
};

/// How many months the income vs expenses chart covers.
const CHART_MONTHS: usize = 6;

/// How many transactions to list under "Recent Transactions".
const RECENT_TRANSACTION_COUNT: usize = 5;

/// Display a page with an overview of the farm's finances.
pub async fn get_dashboard_page(State(state): State<ViewState>) -> Result<Markup, Error> {
    let transactions = state
        .transaction_store
        .get_all()
        .inspect_err(|error| tracing::error!("could not get transactions for dashboard: {error}"))?;

    let all_time = DateFilter::default();
    let summary = summarize(&transactions, &all_time);
    let mut months = monthly_totals(&transactions, &all_time);
    let recent_months = months.split_off(months.len().saturating_sub(CHART_MONTHS));

    Ok(dashboard_view(&summary, &recent_months, &transactions))
}

/// Render the dashboard. `transactions` must be newest first.
fn dashboard_view(
    summary: &Summary,
    monthly_totals: &[MonthlyTotal],
    transactions: &[Transaction],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let has_data = !transactions.is_empty();

    let charts = if has_data {
        vec![
            PageChart {
                id: "income-expense-chart",
                options: income_expense_chart(monthly_totals, "Last six months").to_string(),
            },
            PageChart {
                id: "expense-breakdown-chart",
                options: expense_breakdown_chart(&summary.expenses_by_category).to_string(),
            },
        ]
    } else {
        Vec::new()
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                section class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    (metric_card("Money In", &summary.total_income, "text-green-600 dark:text-green-400"))
                    (metric_card("Money Out", &summary.total_expenses, "text-red-600 dark:text-red-400"))
                    (metric_card("Current Balance", &summary.net_profit, "text-blue-600 dark:text-blue-400"))
                }

                (quick_actions_view())

                @if has_data {
                    (charts_view(&charts))
                } @else {
                    p class="text-gray-500 dark:text-gray-400" data-no-data="true"
                    {
                        "No transactions yet. "
                        a href=(endpoints::INCOME_VIEW) class=(LINK_STYLE) { "Record your first sale" }
                        " to see charts here."
                    }
                }

                (recent_transactions_view(&transactions[..transactions.len().min(RECENT_TRANSACTION_COUNT)]))
            }
        }
    );

    let head_elements = if has_data {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(&charts),
        ]
    } else {
        Vec::new()
    };

    base("Dashboard", &head_elements, &content)
}

fn quick_actions_view() -> Markup {
    let actions = [
        (format!("{}#add-transaction", endpoints::INCOME_VIEW), "Add Income"),
        (format!("{}#add-transaction", endpoints::EXPENSES_VIEW), "Add Expense"),
        (endpoints::REPORTS_VIEW.to_owned(), "Generate Report"),
        (endpoints::EXPORT_TRANSACTIONS.to_owned(), "Export CSV"),
    ];

    html!(
        section id="quick-actions" class="flex flex-wrap gap-2"
        {
            @for (url, title) in &actions {
                a href=(url) class=(BUTTON_SECONDARY_STYLE) { (title) }
            }
        }
    )
}

fn recent_transactions_view(transactions: &[Transaction]) -> Markup {
    html!(
        section id="recent-transactions" class="p-4 bg-white rounded-lg shadow dark:bg-gray-800"
        {
            h2 class="mb-2 text-lg font-semibold" { "Recent Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "Nothing recorded yet." }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in transactions {
                        @let (sign, colour) = match transaction.transaction_type {
                            TransactionType::Income => ("+", "text-green-600 dark:text-green-400"),
                            TransactionType::Expense => ("-", "text-red-600 dark:text-red-400"),
                        };

                        li class="flex justify-between items-center py-2 gap-4"
                        {
                            div
                            {
                                p class="font-medium" { (transaction.description) }
                                p class="text-xs text-gray-500 dark:text-gray-400"
                                {
                                    time datetime=(transaction.date) { (transaction.date) }
                                    " "
                                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                                }
                            }

                            span class={"tabular-nums font-semibold " (colour)}
                            {
                                (sign) (format_decimal_currency(&transaction.amount))
                            }
                        }
                    }
                }
            }
        }
    )
}
