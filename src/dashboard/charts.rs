//! The ECharts donut chart of spending per category.
//!
//! The chart options are generated with `charming` and initialised by a
//! small script once the page has loaded.

use charming::{
    Chart,
    element::{JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::PreEscaped;

use crate::{aggregation::CategoryTotal, html::HeadElement};

/// The HTML element ID of the donut chart container.
pub(super) const DONUT_CHART_ID: &str = "category-breakdown-chart";

/// The default ECharts palette, reused by the HTML legends so their colours
/// line up with the chart.
pub(super) const PALETTE: [&str; 9] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc",
];

/// The colour of the `index`-th category.
pub(super) fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

pub(super) fn spending_donut_chart(totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|total| (total.amount, total.name.as_str()))
        .collect();

    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .label(Label::new().show(false))
                .data(data),
        )
}

/// Generates the JavaScript that initialises the dashboard charts.
///
/// Each chart follows the browser's colour scheme and resizes with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{
                        return;
                    }}
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
                chart.id,
                // Category names are user data, keep them from closing the script tag.
                chart.options.replace("</", "<\\/")
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

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-GB', {
              style: 'currency',
              currency: 'GBP'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
