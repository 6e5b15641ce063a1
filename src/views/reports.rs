//! The reports page: totals, category breakdowns and charts over a date range.
//!
//! The range is either a preset period such as "Last Month" or a custom
//! `startDate` and `endDate`.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_decimal_currency, metric_card,
    },
    navigation::NavBar,
    report::{
        DateFilter, DateRangeQuery, MonthlyTotal, ReportPeriod, Summary, monthly_totals,
        summarize,
    },
    validation::{FieldError, Validate, optional_text},
    views::{
        ViewState,
        charts::{
            ECHARTS_SCRIPT, PageChart, charts_script, charts_view, expense_breakdown_chart,
            income_expense_chart,
        },
    },
};

/// Editing a date by hand means the preset no longer applies.
const SWITCH_TO_CUSTOM: &str = "this.form.period.value = 'custom'";

/// The report form's query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// A preset such as "last-month". Empty or "custom" uses the dates below.
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Display the financial report for a preset period or the optional `startDate` and `endDate`.
///
/// # Errors
/// Returns [Error::InvalidInput] if the period is unknown or either date is
/// malformed, which is shown as a 400 page.
pub async fn get_reports_page(
    State(state): State<ViewState>,
    Query(query): Query<ReportQuery>,
) -> Result<Markup, Error> {
    reports_page(&state, query, OffsetDateTime::now_utc().date())
}

fn reports_page(state: &ViewState, query: ReportQuery, today: Date) -> Result<Markup, Error> {
    let (period, filter) = report_range(query, today)?;

    let transactions = state
        .transaction_store
        .get_all()
        .inspect_err(|error| tracing::error!("could not get transactions for report: {error}"))?;

    let summary = summarize(&transactions, &filter);
    let months = monthly_totals(&transactions, &filter);

    Ok(reports_view(period, &filter, &summary, &months))
}

/// The period and the dates it covers. A preset period overrides the dates.
fn report_range(query: ReportQuery, today: Date) -> Result<(ReportPeriod, DateFilter), Error> {
    let period = match optional_text(query.period) {
        None => ReportPeriod::Custom,
        Some(period) => period.parse::<ReportPeriod>().map_err(|_| Error::InvalidInput {
            message: "Invalid report period",
            errors: vec![FieldError::new(
                "period",
                "Expected this-month, last-month, this-year, last-year or custom",
            )],
        })?,
    };

    let custom_range = DateRangeQuery {
        start_date: query.start_date,
        end_date: query.end_date,
    }
    .validate()
    .map_err(|errors| Error::InvalidInput {
        message: DateRangeQuery::INVALID_MESSAGE,
        errors,
    })?;

    let filter = period.date_filter(today).unwrap_or(custom_range);

    Ok((period, filter))
}

/// The query string for `filter`, e.g. "?startDate=2024-01-01", or an empty string.
fn range_query_string(filter: &DateFilter) -> String {
    let params: Vec<String> = [("startDate", filter.start), ("endDate", filter.end)]
        .into_iter()
        .filter_map(|(name, date)| date.map(|date| format!("{name}={date}")))
        .collect();

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

fn reports_view(
    period: ReportPeriod,
    filter: &DateFilter,
    summary: &Summary,
    monthly_totals: &[MonthlyTotal],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let export_url = format!(
        "{}{}",
        endpoints::EXPORT_TRANSACTIONS,
        range_query_string(filter)
    );
    let start = filter.start.map(|date| date.to_string()).unwrap_or_default();
    let end = filter.end.map(|date| date.to_string()).unwrap_or_default();

    let has_data = summary.transaction_count > 0;
    let charts = if has_data {
        vec![
            PageChart {
                id: "income-expense-chart",
                options: income_expense_chart(monthly_totals, "By month").to_string(),
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
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Reports" }

                    a id="export-link" href=(export_url) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Export CSV"
                    }
                }

                form
                    method="get"
                    action=(endpoints::REPORTS_VIEW)
                    class="flex flex-wrap items-end gap-4"
                {
                    div
                    {
                        label for="period" class=(FORM_LABEL_STYLE) { "Period" }
                        select id="period" name="period" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for choice in ReportPeriod::ALL {
                                option value=(choice.as_str()) selected[choice == period]
                                {
                                    (choice.label())
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="startDate" class=(FORM_LABEL_STYLE) { "From" }
                        input
                            id="startDate"
                            type="date"
                            name="startDate"
                            value=(start)
                            onchange=(SWITCH_TO_CUSTOM)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="endDate" class=(FORM_LABEL_STYLE) { "To" }
                        input
                            id="endDate"
                            type="date"
                            name="endDate"
                            value=(end)
                            onchange=(SWITCH_TO_CUSTOM)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Generate Report" }
                    }
                }

                section class="grid grid-cols-1 md:grid-cols-3 gap-4"
                {
                    (metric_card("Total Income", &summary.total_income, "text-green-600 dark:text-green-400"))
                    (metric_card("Total Expenses", &summary.total_expenses, "text-red-600 dark:text-red-400"))
                    (metric_card("Net Profit", &summary.net_profit, "text-blue-600 dark:text-blue-400"))
                }

                p class="text-sm text-gray-500 dark:text-gray-400" data-transaction-count=(summary.transaction_count)
                {
                    (summary.transaction_count) " transactions in this period."
                }

                @if has_data {
                    (charts_view(&charts))
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    (category_table("income-by-category", "Income by Category", &summary.income_by_category))
                    (category_table("expenses-by-category", "Expenses by Category", &summary.expenses_by_category))
                }
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

    base("Reports", &head_elements, &content)
}

fn category_table(id: &str, title: &str, totals: &BTreeMap<String, Decimal>) -> Markup {
    html!(
        section id=(id) class="overflow-x-auto bg-white rounded-lg shadow dark:bg-gray-800"
        {
            h2 class="p-4 text-lg font-semibold" { (title) }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    }
                }

                tbody
                {
                    @for (category, amount) in totals {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                            {
                                (category)
                            }
                            td class="px-6 py-4 text-right tabular-nums"
                            {
                                (format_decimal_currency(amount))
                            }
                        }
                    }

                    @if totals.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center" { "Nothing in this period." }
                        }
                    }
                }
            }
        }
    )
}
