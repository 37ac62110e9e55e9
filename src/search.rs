//! Case-insensitive search over the transactions of a page.

use crate::transaction::Transaction;

/// The most rows the transaction table displays at once.
pub const SEARCH_DISPLAY_LIMIT: usize = 50;

/// The rows to display for a search along with the counts shown to the user.
#[derive(Debug, PartialEq)]
pub struct SearchResults<'a> {
    /// The matching transactions, capped at [SEARCH_DISPLAY_LIMIT].
    pub rows: Vec<&'a Transaction>,
    /// How many transactions matched before the display cap.
    pub match_count: usize,
    /// How many transactions were searched.
    pub total_count: usize,
}

/// Whether `transaction` matches `query` by description, merchant name or category.
///
/// The stored category is matched, not its display label. `query` must
/// already be lowercase. An empty query matches everything.
fn matches_query(transaction: &Transaction, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(query);

    contains(&transaction.description)
        || transaction.merchant_name.as_deref().is_some_and(contains)
        || transaction.category.as_deref().is_some_and(contains)
}

/// Find the transactions matching `query`, keeping at most [SEARCH_DISPLAY_LIMIT] rows.
pub fn search_transactions<'a>(transactions: &'a [Transaction], query: &str) -> SearchResults<'a> {
    let query = query.trim().to_lowercase();

    let matches: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| matches_query(transaction, &query))
        .collect();
    let match_count = matches.len();

    SearchResults {
        rows: matches.into_iter().take(SEARCH_DISPLAY_LIMIT).collect(),
        match_count,
        total_count: transactions.len(),
    }
}

#[cfg(test)]
mod search_tests {
    use crate::transaction::Transaction;

    use super::{SEARCH_DISPLAY_LIMIT, search_transactions};

    #[test]
    fn partial_query_matches_description() {
        let transactions = vec![
            Transaction::build(-3.0, "2025-01-01", "Coffee Shop").finalize("1"),
            Transaction::build(-30.0, "2025-01-02", "Groceries")
                .category("Other")
                .finalize("2"),
        ];

        let results = search_transactions(&transactions, "cof");

        assert_eq!(results.rows, vec![&transactions[0]]);
        assert_eq!(results.match_count, 1);
        assert_eq!(results.total_count, 2);
    }

    #[test]
    fn matches_merchant_and_category_ignoring_case() {
        let transactions = vec![
            Transaction::build(-3.0, "2025-01-01", "CARD PAYMENT")
                .merchant_name("Pret A Manger")
                .finalize("1"),
            Transaction::build(-30.0, "2025-01-02", "DD")
                .category("Bills")
                .finalize("2"),
            Transaction::build(-30.0, "2025-01-02", "Other").finalize("3"),
        ];

        assert_eq!(search_transactions(&transactions, "PRET").match_count, 1);
        assert_eq!(search_transactions(&transactions, "bill").match_count, 1);
    }

    #[test]
    fn blank_category_matches_only_by_text() {
        let transactions = vec![
            Transaction::build(-3.0, "2025-01-01", "Corner shop")
                .category("  ")
                .finalize("1"),
            Transaction::build(-3.0, "2025-01-01", "Bus").finalize("2"),
        ];

        assert_eq!(transactions[0].category_label(), "Uncategorized");
        assert_eq!(search_transactions(&transactions, "uncat").match_count, 0);
        assert_eq!(search_transactions(&transactions, "corner").match_count, 1);
    }

    #[test]
    fn empty_query_matches_all() {
        let transactions = vec![
            Transaction::build(-3.0, "2025-01-01", "a").finalize("1"),
            Transaction::build(-3.0, "2025-01-01", "b").finalize("2"),
        ];

        let results = search_transactions(&transactions, "  ");

        assert_eq!(results.match_count, 2);
        assert_eq!(results.rows.len(), 2);
    }

    #[test]
    fn display_is_capped_but_count_is_not() {
        let transactions: Vec<Transaction> = (0..75)
            .map(|i| Transaction::build(-1.0, "2025-01-01", "Coffee").finalize(&i.to_string()))
            .collect();

        let results = search_transactions(&transactions, "coffee");

        assert_eq!(results.rows.len(), SEARCH_DISPLAY_LIMIT);
        assert_eq!(results.match_count, 75);
        assert_eq!(results.rows[0].id, "0");
    }
}
