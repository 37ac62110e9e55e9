//! Shared page layout, styles and formatting helpers for the HTML views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use time::{Date, Month, macros::format_description};

/// The symbol for the one currency the dashboard displays.
pub const CURRENCY_SYMBOL: &str = "£";

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Form styles
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Card style shared by the summary cards and dashboard panels
pub const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

// Category badge styles
pub const INCOME_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-emerald-800 bg-emerald-100 rounded-full \
    dark:bg-emerald-900 dark:text-emerald-300";

pub const EXPENSE_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-indigo-800 bg-indigo-100 rounded-full \
    dark:bg-indigo-900 dark:text-indigo-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col items-center px-2 lg:px-6 py-8 \
    mx-auto max-w-screen-xl text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Dashboard" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.4" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.2" {}

                style
                {
                    r#"
                    .htmx-indicator {
                        display: none;
                    }

                    .htmx-request .htmx-indicator,
                    .htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// A centred notice used for the pages shown instead of the dashboard.
fn notice_view(title: &str, heading: &str, body: &Markup) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class={"max-w-lg w-full mt-16 text-center " (CARD_STYLE)}
            {
                h1 class="text-2xl font-bold mb-4" { (heading) }

                (body)
            }
        }
    );

    base(title, &[], &content)
}

/// The placeholder page shown until the store connection has been configured.
pub fn connection_pending_view() -> Markup {
    notice_view(
        "Database Connection Pending",
        "Database Connection Pending",
        &html!(
            p class="text-gray-600 dark:text-gray-400"
            {
                "Set " code { "SUPABASE_URL" } " and " code { "SUPABASE_ANON_KEY" }
                " (or pass " code { "--store-url" } " and " code { "--store-key" } ") and
                restart the server to see your transactions."
            }
        ),
    )
}

/// The page shown when the transactions could not be read from the store.
pub fn error_loading_data_view(message: &str) -> Markup {
    notice_view(
        "Error Loading Data",
        "Error Loading Data",
        &html!(
            p class="text-red-600 dark:text-red-400 mb-4" { (message) }

            a href="/" class=(LINK_STYLE) { "Try again" }
        ),
    )
}

fn get_thousands_separator_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap_or_else(|_| Formatter::new())
            .precision(Precision::Decimals(0))
    })
}

/// Format an amount as pounds with thousands separators and two decimals,
/// e.g. "£1,234.50" or "-£3.00".
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    // Only the whole part goes through numfmt, it drops trailing zeros from decimals.
    let pounds = get_thousands_separator_formatter().fmt_string((cents / 100) as f64);

    format!("{sign}{CURRENCY_SYMBOL}{pounds}.{:02}", cents % 100)
}

/// Format an ISO 8601 date as "dd/mm/yyyy", returning the input unchanged if
/// it is not a date.
pub fn format_date(date: &str) -> String {
    let iso_date = date.get(..10).unwrap_or(date);

    Date::parse(iso_date, format_description!("[year]-[month]-[day]"))
        .ok()
        .and_then(|date| {
            date.format(format_description!("[day]/[month]/[year]"))
                .ok()
        })
        .unwrap_or_else(|| date.to_owned())
}

/// Format a `YYYY-MM` month key as e.g. "March 2025".
pub fn format_month(month_key: &str) -> String {
    let parsed = month_key.split_once('-').and_then(|(year, month)| {
        let year: i32 = year.parse().ok()?;
        let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
        Some((year, month))
    });

    match parsed {
        Some((year, month)) => format!("{month} {year}"),
        None => month_key.to_owned(),
    }
}

#[cfg(test)]
mod format_tests {
    use super::{format_currency, format_date, format_month};

    #[test]
    fn currency_has_symbol_separators_and_cents() {
        assert_eq!(format_currency(1234.5), "£1,234.50");
        assert_eq!(format_currency(0.0), "£0.00");
        assert_eq!(format_currency(12.3), "£12.30");
        assert_eq!(format_currency(1_000_000.0), "£1,000,000.00");
    }

    #[test]
    fn negative_currency_has_leading_minus() {
        assert_eq!(format_currency(-3.0), "-£3.00");
        assert_eq!(format_currency(-0.001), "£0.00");
    }

    #[test]
    fn currency_rounds_to_cents() {
        assert_eq!(format_currency(0.125), "£0.13");
        assert_eq!(format_currency(9.999), "£10.00");
    }

    #[test]
    fn dates_are_day_month_year() {
        assert_eq!(format_date("2025-03-07"), "07/03/2025");
        assert_eq!(format_date("2025-03-07T10:11:12Z"), "07/03/2025");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn month_keys_are_spelled_out() {
        assert_eq!(format_month("2025-03"), "March 2025");
        assert_eq!(format_month("2025-13"), "2025-13");
        assert_eq!(format_month(""), "");
    }
}
