//! Chart generation and rendering for the dashboard and reports pages.
//!
//! Charts are configured with `charming` and rendered by ECharts in the browser:
//! - **Income vs Expenses**: monthly income and expense totals side by side
//! - **Expense Breakdown**: share of expenses per category

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::Decimal;
use time::{Date, macros::format_description};

use crate::{
    html::HeadElement,
    report::{MonthlyTotal, decimal_to_f64},
};

/// The script for the ECharts library.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct PageChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for charts.
pub(super) fn charts_view(charts: &[PageChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[PageChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Format the first day of a month as e.g. "Jan 2024".
pub(super) fn format_month_label(month: Date) -> String {
    month
        .format(format_description!("[month repr:short] [year]"))
        .unwrap_or_else(|_| month.to_string())
}

pub(super) fn income_expense_chart(monthly_totals: &[MonthlyTotal], subtitle: &str) -> Chart {
    let labels: Vec<String> = monthly_totals
        .iter()
        .map(|total| format_month_label(total.month))
        .collect();
    let income: Vec<f64> = monthly_totals
        .iter()
        .map(|total| decimal_to_f64(&total.income))
        .collect();
    let expenses: Vec<f64> = monthly_totals
        .iter()
        .map(|total| decimal_to_f64(&total.expenses))
        .collect();

    Chart::new()
        .title(Title::new().text("Income vs Expenses").subtext(subtitle))
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expenses").data(expenses))
}

pub(super) fn expense_breakdown_chart(expenses_by_category: &BTreeMap<String, Decimal>) -> Chart {
    let data: Vec<(f64, &str)> = expenses_by_category
        .iter()
        .map(|(category, amount)| (decimal_to_f64(amount), category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expense Breakdown").subtext("By category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "65%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod chart_tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::report::MonthlyTotal;

    use super::{expense_breakdown_chart, format_month_label, income_expense_chart};

    #[test]
    fn month_labels_are_short() {
        assert_eq!(format_month_label(date!(2024 - 01 - 01)), "Jan 2024");
    }

    #[test]
    fn income_expense_chart_has_a_series_per_type() {
        let totals = [MonthlyTotal {
            month: date!(2024 - 03 - 01),
            income: Decimal::new(100, 0),
            expenses: Decimal::new(40, 0),
        }];

        let options = income_expense_chart(&totals, "Last six months").to_string();

        assert!(options.contains("Mar 2024"), "got {options}");
        assert!(options.contains("\"Income\""));
        assert!(options.contains("\"Expenses\""));
    }

    #[test]
    fn breakdown_lists_each_category() {
        let mut expenses = BTreeMap::new();
        expenses.insert("Fertilizer".to_owned(), Decimal::new(40, 0));
        expenses.insert("Fuel".to_owned(), Decimal::new(2525, 2));

        let options = expense_breakdown_chart(&expenses).to_string();

        assert!(options.contains("Fertilizer"));
        assert!(options.contains("Fuel"));
    }
}
