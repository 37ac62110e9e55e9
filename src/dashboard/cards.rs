//! Summary cards and the income vs expenses comparison for the selected month.

use maud::{Markup, html};

use crate::{
    aggregation::{IncomeExpenseSummary, percentage_of},
    html::{CARD_STYLE, format_currency},
};

/// Format a percentage with one decimal place, avoiding "-0.0".
fn format_percentage(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        "0.0".to_owned()
    } else {
        format!("{rounded:.1}")
    }
}

/// The net balance with an explicit `+` when it is not negative.
fn format_net_balance(net_balance: f64) -> String {
    if net_balance >= 0.0 {
        format!("+{}", format_currency(net_balance))
    } else {
        format_currency(net_balance)
    }
}

fn summary_card(title: &str, value: &str, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (title) }

            div class={"text-2xl font-bold " (value_style)} { (value) }
        }
    }
}

/// Renders the Total Income, Total Expenses, Net Balance and Savings Rate cards.
pub(super) fn summary_cards_view(summary: &IncomeExpenseSummary) -> Markup {
    let net_style = if summary.net_balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section
            id="summary-cards"
            class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-6"
        {
            (summary_card("Total Income", &format_currency(summary.total_income), "text-green-600 dark:text-green-400"))
            (summary_card("Total Expenses", &format_currency(summary.total_expenses), "text-red-600 dark:text-red-400"))
            (summary_card("Net Balance", &format_net_balance(summary.net_balance), net_style))
            (summary_card("Savings Rate", &format!("{}%", format_percentage(summary.savings_rate)), ""))
        }
    }
}

/// The bar widths of the income vs expenses panel as percentages of income.
#[derive(Debug, PartialEq)]
struct ComparisonBars {
    income: f64,
    expenses: f64,
    net: f64,
}

impl ComparisonBars {
    fn new(summary: &IncomeExpenseSummary) -> Self {
        if summary.total_income <= 0.0 {
            return Self {
                income: 0.0,
                expenses: 0.0,
                net: 0.0,
            };
        }

        Self {
            income: 100.0,
            expenses: percentage_of(summary.total_expenses, summary.total_income),
            net: percentage_of(summary.net_balance.abs(), summary.total_income),
        }
    }
}

/// The sentence under the comparison bars.
fn savings_message(summary: &IncomeExpenseSummary) -> String {
    if summary.net_balance >= 0.0 {
        format!(
            "You saved {} this month ({}% of your income).",
            format_currency(summary.net_balance),
            format_percentage(summary.savings_rate)
        )
    } else {
        format!(
            "You spent {} more than you earned this month.",
            format_currency(summary.net_balance.abs())
        )
    }
}

fn comparison_bar(label: &str, amount: &str, width: f64, bar_style: &str) -> Markup {
    // Bars can exceed 100% when spending is more than income, cap the drawn width.
    let width = width.clamp(0.0, 100.0);

    html! {
        div class="mb-3"
        {
            div class="flex justify-between text-sm mb-1"
            {
                span { (label) }
                span class="font-semibold" { (amount) }
            }

            div class="w-full h-3 bg-gray-200 dark:bg-gray-700 rounded-full"
            {
                div
                    class={"h-3 rounded-full " (bar_style)}
                    style=(format!("width: {width:.1}%"))
                {}
            }
        }
    }
}

/// Renders the income vs expenses panel.
pub(super) fn income_vs_expenses_view(summary: &IncomeExpenseSummary) -> Markup {
    let bars = ComparisonBars::new(summary);
    let net_style = if summary.net_balance >= 0.0 {
        "bg-green-500"
    } else {
        "bg-red-500"
    };

    html! {
        section id="income-vs-expenses" class={"w-full " (CARD_STYLE)}
        {
            h3 class="text-xl font-semibold mb-4" { "Income vs Expenses" }

            (comparison_bar("Income", &format_currency(summary.total_income), bars.income, "bg-emerald-500"))
            (comparison_bar("Expenses", &format_currency(summary.total_expenses), bars.expenses, "bg-indigo-500"))
            (comparison_bar("Net Balance", &format_net_balance(summary.net_balance), bars.net, net_style))

            p id="savings-message" class="text-sm text-gray-600 dark:text-gray-400 mt-4"
            {
                (savings_message(summary))
            }
        }
    }
}

#[cfg(test)]
mod cards_tests {
    use scraper::{Html, Selector};

    use crate::{aggregation::IncomeExpenseSummary, test_utils::assert_valid_html};

    use super::{
        ComparisonBars, format_net_balance, format_percentage, income_vs_expenses_view,
        savings_message, summary_cards_view,
    };

    fn summary(total_income: f64, total_expenses: f64) -> IncomeExpenseSummary {
        let net_balance = total_income - total_expenses;

        IncomeExpenseSummary {
            total_income,
            total_expenses,
            net_balance,
            savings_rate: if total_income > 0.0 {
                net_balance / total_income * 100.0
            } else {
                0.0
            },
        }
    }

    #[test]
    fn cards_show_formatted_figures() {
        let html = Html::parse_fragment(&summary_cards_view(&summary(2000.0, 17.5)).into_string());
        assert_valid_html(&html);

        let text: String = html
            .select(&Selector::parse("#summary-cards").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();

        assert!(text.contains("Total Income"));
        assert!(text.contains("£2,000.00"));
        assert!(text.contains("£17.50"));
        assert!(text.contains("+£1,982.50"));
        assert!(text.contains("99.1%"));
    }

    #[test]
    fn net_balance_sign() {
        assert_eq!(format_net_balance(0.0), "+£0.00");
        assert_eq!(format_net_balance(-12.0), "-£12.00");
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(99.125), "99.1");
        assert_eq!(format_percentage(-0.01), "0.0");
    }

    #[test]
    fn bars_are_relative_to_income() {
        assert_eq!(
            ComparisonBars::new(&summary(200.0, 50.0)),
            ComparisonBars {
                income: 100.0,
                expenses: 25.0,
                net: 75.0
            }
        );
        assert_eq!(
            ComparisonBars::new(&summary(0.0, 50.0)),
            ComparisonBars {
                income: 0.0,
                expenses: 0.0,
                net: 0.0
            }
        );
    }

    #[test]
    fn message_for_saving_and_overspending() {
        assert_eq!(
            savings_message(&summary(2000.0, 17.5)),
            "You saved £1,982.50 this month (99.1% of your income)."
        );
        assert_eq!(
            savings_message(&summary(100.0, 150.0)),
            "You spent £50.00 more than you earned this month."
        );
    }

    #[test]
    fn panel_renders_message() {
        let html = Html::parse_fragment(
            &income_vs_expenses_view(&summary(100.0, 150.0)).into_string(),
        );
        assert_valid_html(&html);

        let message: String = html
            .select(&Selector::parse("#savings-message").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();

        assert_eq!(message.trim(), "You spent £50.00 more than you earned this month.");
    }
}
