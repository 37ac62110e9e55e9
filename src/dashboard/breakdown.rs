//! The spending breakdown panel: a month selector and the category totals
//! drawn by the configured [BreakdownStyle].

use maud::{Markup, html};

use crate::{
    aggregation::{CategoryTotal, percentage_of},
    config::BreakdownStyle,
    dashboard::charts::{DONUT_CHART_ID, palette_color},
    endpoints,
    html::{
        CARD_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency, format_month,
    },
};

/// The smallest and largest bubble diameters in pixels.
const MIN_BUBBLE_SIZE: f64 = 48.0;
const MAX_BUBBLE_SIZE: f64 = 160.0;

/// Renders the month selector and the spending breakdown.
pub(super) fn breakdown_view(
    style: BreakdownStyle,
    totals: &[CategoryTotal],
    months: &[String],
    active_month: &str,
) -> Markup {
    let total_spent: f64 = totals.iter().map(|total| total.amount).sum();

    html! {
        section id="spending-breakdown" class={"w-full " (CARD_STYLE)}
        {
            div class="flex flex-wrap justify-between items-baseline gap-2 mb-4"
            {
                h3 class="text-xl font-semibold" { "Spending Breakdown" }

                (month_selector(months, active_month))
            }

            @if totals.is_empty() {
                p class="text-gray-600 dark:text-gray-400 text-center py-8"
                {
                    "No spending recorded for this month"
                }
            } @else {
                @match style {
                    BreakdownStyle::Donut => { (donut_view(totals, total_spent)) }
                    BreakdownStyle::Bubble => { (bubble_view(totals, total_spent)) }
                    BreakdownStyle::Table => { (table_view(totals, total_spent)) }
                }
            }
        }
    }
}

/// A select box that reloads the dashboard for the chosen month.
fn month_selector(months: &[String], active_month: &str) -> Markup {
    html! {
        form method="get" action=(endpoints::ROOT) class="flex items-center gap-2"
        {
            label for="month" class="text-sm text-gray-600 dark:text-gray-400" { "Month" }

            select
                id="month"
                name="month"
                class=(FORM_TEXT_INPUT_STYLE)
                onchange="this.form.submit()"
                disabled[months.is_empty()]
            {
                @for month in months {
                    option value=(month) selected[month.as_str() == active_month] { (format_month(month)) }
                }
            }
        }
    }
}

fn legend_entry(index: usize, total: &CategoryTotal, total_spent: f64) -> Markup {
    html! {
        li class="flex items-center justify-between gap-4 text-sm"
        {
            span class="flex items-center gap-2"
            {
                span
                    class="inline-block w-3 h-3 rounded-full"
                    style=(format!("background-color: {}", palette_color(index)))
                {}
                (total.name)
            }

            span
            {
                (format_currency(total.amount))
                " "
                span class="text-gray-500" { "(" (format!("{:.1}", percentage_of(total.amount, total_spent))) "%)" }
            }
        }
    }
}

/// The donut chart container with a legend. The chart itself is drawn by
/// the script from [super::charts::charts_script].
fn donut_view(totals: &[CategoryTotal], total_spent: f64) -> Markup {
    html! {
        div class="grid grid-cols-1 md:grid-cols-2 gap-4 items-center"
        {
            div id=(DONUT_CHART_ID) class="min-h-[300px]" {}

            ul class="space-y-2"
            {
                @for (index, total) in totals.iter().enumerate() {
                    (legend_entry(index, total, total_spent))
                }
            }
        }
    }
}

/// The bubble diameter for a category with `share` percent of spending.
fn bubble_size(share: f64) -> f64 {
    let share = share.clamp(0.0, 100.0) / 100.0;
    // Scale the area rather than the diameter so large categories do not dominate.
    MIN_BUBBLE_SIZE + (MAX_BUBBLE_SIZE - MIN_BUBBLE_SIZE) * share.sqrt()
}

fn bubble_view(totals: &[CategoryTotal], total_spent: f64) -> Markup {
    html! {
        div class="flex flex-wrap justify-center items-center gap-4 py-4"
        {
            @for (index, total) in totals.iter().enumerate() {
                @let share = percentage_of(total.amount, total_spent);
                @let size = bubble_size(share);

                div
                    class="bubble flex flex-col items-center justify-center rounded-full text-white text-center p-2 shadow"
                    style=(format!(
                        "width: {size:.0}px; height: {size:.0}px; background-color: {}",
                        palette_color(index)
                    ))
                    title=(format!("{}: {} ({share:.1}%)", total.name, format_currency(total.amount)))
                {
                    span class="text-xs font-semibold truncate max-w-full" { (total.name) }
                    span class="text-xs" { (format!("{share:.0}%")) }
                }
            }
        }
    }
}

fn table_view(totals: &[CategoryTotal], total_spent: f64) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                    th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Share" }
                }
            }

            tbody
            {
                @for total in totals {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                        {
                            (total.name)
                        }
                        td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(total.amount)) }
                        td class={(TABLE_CELL_STYLE) " text-right"}
                        {
                            (format!("{:.1}%", percentage_of(total.amount, total_spent)))
                        }
                    }
                }
            }
        }
    }
}
