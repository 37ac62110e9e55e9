//! Pure functions that turn a list of transactions into the figures shown on
//! the dashboard.
//!
//! Every renderer consumes the same [CategoryTotal] list, so the breakdown is
//! computed in exactly one place.

use std::collections::HashMap;

use crate::transaction::Transaction;

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label, blank categories use the uncategorized label.
    pub name: String,
    /// The sum of absolute amounts, rounded to two decimal places.
    pub amount: f64,
}

/// Money in, money out and what is left over.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IncomeExpenseSummary {
    /// Sum of the absolute amounts of income transactions.
    pub total_income: f64,
    /// Sum of the absolute amounts of every other transaction.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub net_balance: f64,
    /// Net balance as a percentage of income, zero when there is no income.
    pub savings_rate: f64,
}

/// Keep the transactions whose date starts with `month_key`.
///
/// An empty key keeps every transaction.
pub fn filter_by_month<'a>(transactions: &'a [Transaction], month_key: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| month_key.is_empty() || transaction.date.starts_with(month_key))
        .collect()
}

/// Sum expenses per category, largest first.
///
/// Income and zero amounts are skipped. Ties keep the order in which the
/// categories were first seen.
pub fn category_totals<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions {
        let amount = transaction.absolute_amount();

        if transaction.is_income || amount == 0.0 {
            continue;
        }

        let label = transaction.category_label();
        let sum = sums.entry(label).or_insert_with(|| {
            order.push(label);
            0.0
        });
        *sum += amount;
    }

    let mut totals: Vec<CategoryTotal> = order
        .into_iter()
        .map(|label| CategoryTotal {
            name: label.to_owned(),
            amount: round_to_cents(sums.get(label).copied().unwrap_or_default()),
        })
        .collect();

    // `sort_by` is stable, so ties keep their first-seen order.
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals
}

/// Total the income and expenses of `transactions`.
pub fn income_expense_summary<'a, I>(transactions: I) -> IncomeExpenseSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (total_income, total_expenses) =
        transactions
            .into_iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                if transaction.is_income {
                    (income + transaction.absolute_amount(), expenses)
                } else {
                    (income, expenses + transaction.absolute_amount())
                }
            });

    let net_balance = total_income - total_expenses;

    IncomeExpenseSummary {
        total_income,
        total_expenses,
        net_balance,
        savings_rate: percentage_of(net_balance, total_income),
    }
}

/// The unique `YYYY-MM` keys in `transactions`, most recent first.
pub fn distinct_months<'a, I>(transactions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut months: Vec<String> = transactions
        .into_iter()
        .map(|transaction| transaction.month_key().to_owned())
        .collect();

    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    months
}

/// `part` as a percentage of `whole`, or zero if `whole` is not positive.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// The month to display: the requested month if there is one, otherwise the
/// most recent month, otherwise an empty key.
pub fn active_month(requested: Option<&str>, months: &[String]) -> String {
    match requested.map(str::trim) {
        Some(month) if !month.is_empty() => month.to_owned(),
        _ => months.first().cloned().unwrap_or_default(),
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
