//! The "Recent Activity" table with search and inline category editing.

use maud::{Markup, html};

use crate::{
    category_editor::{CategoryEditor, RowState},
    endpoints::{self, format_endpoint, with_query},
    html::{
        CARD_STYLE, EXPENSE_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, INCOME_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_date,
    },
    page_view::PageViewId,
    search::search_transactions,
    transaction::{Category, Transaction},
};

/// The ID of the element wrapping the whole table, replaced after a failed save.
pub(crate) const TRANSACTIONS_TABLE_ID: &str = "transactions-table";
const TRANSACTION_RESULTS_ID: &str = "transaction-results";
const SEARCH_INPUT_ID: &str = "transaction-search";

/// An HTML ID for the category cell of the transaction with the key `transaction_id`.
///
/// Keys may contain any character, so they are hex encoded.
pub(crate) fn category_cell_id(transaction_id: &str) -> String {
    let encoded: String = transaction_id
        .bytes()
        .map(|byte| format!("{byte:02x}"))
        .collect();

    format!("category-{encoded}")
}

fn badge_style(transaction: &Transaction) -> &'static str {
    if transaction.is_income {
        INCOME_BADGE_STYLE
    } else {
        EXPENSE_BADGE_STYLE
    }
}

/// The category cell for `transaction` in the given state.
pub(crate) fn category_cell_view(
    view_id: PageViewId,
    transaction: &Transaction,
    state: RowState,
) -> Markup {
    match state {
        RowState::Viewing => viewing_cell(view_id, transaction, false),
        RowState::Editing => editing_cell(view_id, transaction),
        RowState::Saving => saving_cell(transaction),
    }
}

/// The viewing cell for `transaction` as an out-of-band swap, used to close
/// the select box of a row when another row starts editing.
pub(crate) fn category_cell_oob_view(view_id: PageViewId, transaction: &Transaction) -> Markup {
    viewing_cell(view_id, transaction, true)
}

fn viewing_cell(view_id: PageViewId, transaction: &Transaction, oob: bool) -> Markup {
    let edit_url = with_query(
        &format_endpoint(endpoints::PAGE_VIEW_EDIT_CATEGORY, view_id),
        &[("transaction_id", transaction.key())],
    );

    html! {
        td
            id=(category_cell_id(transaction.key()))
            class=(TABLE_CELL_STYLE)
            hx-swap-oob=[oob.then_some("true")]
        {
            button
                type="button"
                title="Change category"
                class={(badge_style(transaction)) " cursor-pointer hover:opacity-80"}
                hx-get=(edit_url)
                hx-target="closest td"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
            {
                (transaction.category_label())
            }
        }
    }
}

fn editing_cell(view_id: PageViewId, transaction: &Transaction) -> Markup {
    let save_url = format_endpoint(endpoints::PAGE_VIEW_CATEGORY, view_id);
    let cancel_url = with_query(&save_url, &[("transaction_id", transaction.key())]);
    let current = transaction.category_label();
    let is_known_category = current.parse::<Category>().is_ok();

    html! {
        td id=(category_cell_id(transaction.key())) class=(TABLE_CELL_STYLE)
        {
            form
                hx-post=(save_url)
                hx-trigger="change"
                hx-target="closest td"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-include={"#" (SEARCH_INPUT_ID)}
                class="flex items-center gap-2"
            {
                input type="hidden" name="transaction_id" value=(transaction.key());

                select
                    name="category"
                    aria-label="Category"
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE)
                    hx-get=(cancel_url)
                    hx-trigger="blur, keyup[key=='Escape']"
                    hx-target="closest td"
                    hx-swap="outerHTML"
                {
                    @if !is_known_category {
                        option value=(current) selected disabled { (current) }
                    }

                    @for category in Category::ALL {
                        option
                            value=(category.as_str())
                            selected[category.as_str() == current]
                        {
                            (category.as_str())
                        }
                    }
                }

                span class="htmx-indicator text-xs text-gray-500" { "Saving…" }
            }
        }
    }
}

fn saving_cell(transaction: &Transaction) -> Markup {
    html! {
        td id=(category_cell_id(transaction.key())) class=(TABLE_CELL_STYLE)
        {
            span class={(badge_style(transaction)) " opacity-60"} aria-busy="true"
            {
                (transaction.category_label())
            }

            span class="ml-2 text-xs text-gray-500" { "Saving…" }
        }
    }
}

/// The amount with a `+` for income and a `-` for expenses.
fn format_signed_amount(transaction: &Transaction) -> String {
    let sign = if transaction.is_income { "+" } else { "-" };

    format!("{sign}{}", format_currency(transaction.absolute_amount()))
}

fn transaction_row(view_id: PageViewId, editor: &CategoryEditor, transaction: &Transaction) -> Markup {
    let amount_style = if transaction.is_income {
        "text-green-600 dark:text-green-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (format_date(&transaction.date)) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="font-medium text-gray-900 dark:text-white" { (transaction.description) }

                @if let Some(merchant_name) = &transaction.merchant_name {
                    div class="text-xs text-gray-500" { (merchant_name) }
                }
            }

            (category_cell_view(view_id, transaction, editor.row_state(transaction.key())))

            td class={(TABLE_CELL_STYLE) " text-right font-semibold whitespace-nowrap " (amount_style)}
            {
                (format_signed_amount(transaction))
            }
        }
    }
}

/// The search results: the match count, the rows or an empty state.
pub(crate) fn transaction_results_view(
    view_id: PageViewId,
    editor: &CategoryEditor,
    query: &str,
) -> Markup {
    let results = search_transactions(editor.transactions(), query);
    let has_query = !query.trim().is_empty();

    html! {
        div id=(TRANSACTION_RESULTS_ID)
        {
            @if has_query {
                p id="search-count" class="text-sm text-gray-600 dark:text-gray-400 mb-2"
                {
                    "Showing " (results.match_count) " of " (results.total_count) " transactions"
                }
            }

            @if results.rows.is_empty() {
                p class="text-gray-600 dark:text-gray-400 text-center py-8"
                {
                    @if has_query {
                        "No transactions match your search"
                    } @else {
                        "No transactions for selected month"
                    }
                }
            } @else {
                div class="relative overflow-x-auto rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            }
                        }

                        tbody
                        {
                            @for transaction in results.rows {
                                (transaction_row(view_id, editor, transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The whole transaction table section including the search box.
pub(crate) fn transactions_table_view(
    view_id: PageViewId,
    editor: &CategoryEditor,
    query: &str,
) -> Markup {
    let search_url = format_endpoint(endpoints::PAGE_VIEW_TRANSACTIONS, view_id);

    html! {
        section id=(TRANSACTIONS_TABLE_ID) class={"w-full " (CARD_STYLE)}
        {
            div class="flex flex-wrap justify-between items-center gap-2 mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Activity" }

                div class="w-full sm:w-72"
                {
                    input
                        id=(SEARCH_INPUT_ID)
                        type="search"
                        name="q"
                        value=(query)
                        placeholder="Search transactions"
                        aria-label="Search transactions"
                        class=(FORM_TEXT_INPUT_STYLE)
                        hx-get=(search_url)
                        hx-trigger="input changed delay:300ms, search"
                        hx-target={"#" (TRANSACTION_RESULTS_ID)}
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container";
                }
            }

            (transaction_results_view(view_id, editor, query))
        }
    }
}

#[cfg(test)]
mod transactions_table_tests {
    use scraper::{Html, Selector};

    use crate::{
        category_editor::{CategoryEditor, RowState},
        test_utils::assert_valid_html,
        transaction::Transaction,
    };

    use super::{
        category_cell_id, category_cell_oob_view, category_cell_view, format_signed_amount,
        transactions_table_view,
    };

    fn editor() -> CategoryEditor {
        CategoryEditor::new(vec![
            Transaction::build(-3.5, "2025-03-07", "Coffee Shop")
                .external_id("tx1")
                .merchant_name("Pret")
                .category("Dining")
                .finalize("1"),
            Transaction::build(2000.0, "2025-03-01", "Salary")
                .category("Income")
                .income(true)
                .finalize("2"),
            Transaction::build(-40.0, "2025-03-02", "Groceries")
                .category("Other")
                .finalize("3"),
        ])
    }

    fn render(editor: &CategoryEditor, query: &str) -> Html {
        let html = Html::parse_fragment(&transactions_table_view(1, editor, query).into_string());
        assert_valid_html(&html);
        html
    }

    fn text_of(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn rows_show_date_badge_and_signed_amount() {
        let html = render(&editor(), "");

        let rows = text_of(&html, "tbody tr");
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("07/03/2025"));
        assert!(rows[0].contains("-£3.50"));
        assert!(rows[1].contains("+£2,000.00"));
        assert_eq!(text_of(&html, "h3"), ["Recent Activity"]);
    }

    #[test]
    fn badges_are_coloured_by_income() {
        let html = render(&editor(), "");

        let badges: Vec<String> = html
            .select(&Selector::parse("tbody td button").unwrap())
            .map(|badge| badge.value().attr("class").unwrap_or_default().to_owned())
            .collect();

        assert!(badges[0].contains("indigo"));
        assert!(badges[1].contains("emerald"));
    }

    #[test]
    fn count_only_shown_while_searching() {
        let html = render(&editor(), "");
        assert!(text_of(&html, "#search-count").is_empty());

        let html = render(&editor(), "cof");
        assert_eq!(
            text_of(&html, "#search-count"),
            ["Showing 1 of 3 transactions"]
        );
        assert_eq!(text_of(&html, "tbody tr").len(), 1);
    }

    #[test]
    fn empty_states() {
        let html = render(&editor(), "zzz");
        assert!(text_of(&html, "p").contains(&"No transactions match your search".to_owned()));

        let html = render(&CategoryEditor::new(vec![]), "");
        assert!(text_of(&html, "p").contains(&"No transactions for selected month".to_owned()));
    }

    #[test]
    fn blank_category_shows_sentinel() {
        let transaction = Transaction::build(-1.0, "2025-03-01", "Bus").finalize("9");
        let html = Html::parse_fragment(&format!(
            "<table><tr>{}</tr></table>",
            category_cell_view(1, &transaction, RowState::Viewing).into_string()
        ));

        assert_eq!(text_of(&html, "button"), ["Uncategorized"]);
    }

    #[test]
    fn editing_cell_preselects_current_category() {
        let transaction = Transaction::build(-1.0, "2025-03-01", "Bus")
            .external_id("tx 9")
            .category("Transport")
            .finalize("9");
        let html = Html::parse_fragment(&format!(
            "<table><tr>{}</tr></table>",
            category_cell_view(4, &transaction, RowState::Editing).into_string()
        ));
        assert_valid_html(&html);

        let selected = text_of(&html, "option[selected]");
        assert_eq!(selected, ["Transport"]);
        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .unwrap();
        assert_eq!(form.value().attr("hx-post"), Some("/views/4/category"));
        let select = html
            .select(&Selector::parse("select").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            select.value().attr("hx-get"),
            Some("/views/4/category?transaction_id=tx+9")
        );
    }

    #[test]
    fn unknown_category_is_kept_as_disabled_option() {
        let transaction = Transaction::build(-1.0, "2025-03-01", "Shop")
            .category("Other")
            .finalize("9");
        let html = Html::parse_fragment(&format!(
            "<table><tr>{}</tr></table>",
            category_cell_view(1, &transaction, RowState::Editing).into_string()
        ));

        assert_eq!(text_of(&html, "option[disabled]"), ["Other"]);
    }

    #[test]
    fn oob_cell_replaces_cell_by_id() {
        let transaction = Transaction::build(-1.0, "2025-03-01", "Bus").finalize("9");
        let html = Html::parse_fragment(&format!(
            "<table><tr>{}</tr></table>",
            category_cell_oob_view(1, &transaction).into_string()
        ));

        let cell = html.select(&Selector::parse("td").unwrap()).next().unwrap();
        assert_eq!(cell.value().attr("hx-swap-oob"), Some("true"));
        assert_eq!(cell.value().attr("id"), Some(category_cell_id("9").as_str()));
    }

    #[test]
    fn cell_ids_are_valid_for_any_key() {
        assert_eq!(category_cell_id("a b"), "category-612062");
    }

    #[test]
    fn signed_amount_uses_income_flag() {
        let expense = Transaction::build(12.0, "2025-03-01", "Refund?").finalize("1");

        assert_eq!(format_signed_amount(&expense), "-£12.00");
    }
}
