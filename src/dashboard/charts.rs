//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the ledger:
//! - **Expense Distribution**: Pie chart of total spending per category
//! - **Expenses by Category**: Bar chart of the mean amount per entry for each
//!   category, with one series per salary
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    analysis::{CATEGORY_LABELS, CategoryTotals, SalaryGroup},
    html::{HeadElement, format_currency},
};

/// Where the ECharts library is loaded from.
pub(super) const ECHARTS_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
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

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
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

/// A pie chart of how much was spent in each category.
pub(super) fn expense_distribution_chart(totals: &CategoryTotals) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .labelled()
        .into_iter()
        .map(|(label, amount)| (amount, label))
        .collect();

    Chart::new()
        .title(Title::new().text("Expense Distribution"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["0%", "65%"])
                .data(data),
        )
}

/// A bar chart with the categories along the x-axis and one series per salary.
pub(super) fn salary_bar_chart(groups: &[SalaryGroup]) -> Chart {
    let labels: Vec<String> = CATEGORY_LABELS.iter().map(|label| label.to_string()).collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Expenses by Category Colored by Salary"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom("0"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("12%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for group in groups {
        let values: Vec<f64> = group
            .amounts
            .labelled()
            .iter()
            .map(|(_, amount)| *amount)
            .collect();

        chart = chart.series(
            bar::Bar::new()
                .name(format!("Salary {}", format_currency(group.salary)))
                .data(values),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
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
mod tests {
    use crate::{
        analysis::{CategoryTotals, SalaryGroup},
        html::HeadElement,
    };

    use super::{
        DashboardChart, charts_script, charts_view, expense_distribution_chart, salary_bar_chart,
    };

    fn totals() -> CategoryTotals {
        CategoryTotals {
            food: 1200.0,
            fuel: 300.0,
            groceries: 850.0,
            other: 75.0,
        }
    }

    #[test]
    fn distribution_chart_has_each_category() {
        let options = expense_distribution_chart(&totals()).to_string();

        assert!(options.contains("Expense Distribution"));
        for label in ["Food", "Fuel", "Groceries", "Other"] {
            assert!(options.contains(label), "missing {label} in {options}");
        }
        assert!(options.contains("\"pie\""));
    }

    #[test]
    fn bar_chart_names_series_after_salary() {
        let groups = [SalaryGroup {
            salary: 45_000.0,
            amounts: totals(),
        }];

        let options = salary_bar_chart(&groups).to_string();

        assert!(options.contains("Expenses by Category Colored by Salary"));
        assert!(options.contains("Salary ₹45,000.00"), "got {options}");
        assert!(options.contains("\"bar\""));
    }

    #[test]
    fn bar_chart_without_groups_has_no_series() {
        let options = salary_bar_chart(&[]).to_string();

        assert!(!options.contains("\"bar\""));
    }

    #[test]
    fn view_has_container_per_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let markup = charts_view(&charts).into_string();

        assert!(markup.contains("id=\"first-chart\""));
        assert!(markup.contains("id=\"second-chart\""));
    }

    #[test]
    fn script_initializes_each_chart() {
        let charts = [DashboardChart {
            id: "pie-chart",
            options: "{\"title\":{}}".to_owned(),
        }];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want script source");
        };

        assert!(script.0.contains("getElementById(\"pie-chart\")"));
        assert!(script.0.contains("{\"title\":{}}"));
        assert!(script.0.starts_with("document.addEventListener('DOMContentLoaded'"));
    }
}
