//! The dashboard page handler and view.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::{
        CategoryTotal, IncomeExpenseSummary, active_month, category_totals, distinct_months,
        filter_by_month, income_expense_summary,
    },
    category_editor::CategoryEditor,
    config::BreakdownStyle,
    dashboard::{
        breakdown::breakdown_view,
        cards::{income_vs_expenses_view, summary_cards_view},
        charts::{DONUT_CHART_ID, DashboardChart, charts_script, spending_donut_chart},
        transactions_table::transactions_table_view,
    },
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    page_view::PageViewId,
};

const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The month to show as `YYYY-MM`, defaults to the latest month with data.
    pub month: Option<String>,
}

/// Everything shown for the selected month.
struct MonthOverview {
    months: Vec<String>,
    active_month: String,
    summary: IncomeExpenseSummary,
    totals: Vec<CategoryTotal>,
}

/// Display the dashboard for the month in the query string.
///
/// The transactions are fetched from the store on every request and a new
/// page view is opened for the table of the selected month.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let store = state.store()?;
    let transactions = store
        .get_transactions()
        .await
        .map_err(Error::LoadTransactions)?;

    let months = distinct_months(&transactions);
    let active_month = active_month(query.month.as_deref(), &months);
    let month_transactions: Vec<_> = filter_by_month(&transactions, &active_month)
        .into_iter()
        .cloned()
        .collect();

    let overview = MonthOverview {
        summary: income_expense_summary(&month_transactions),
        totals: category_totals(&month_transactions),
        months,
        active_month,
    };

    let mut page_views = state.lock_page_views()?;
    let view_id = page_views.open(month_transactions);
    let editor = page_views.get(view_id).ok_or(Error::NotFound)?;

    tracing::debug!(
        "Opened page view {view_id} for {} with {} transactions, {} page views open",
        overview.active_month,
        editor.transactions().len(),
        page_views.len()
    );

    Ok(dashboard_view(state.breakdown, &overview, view_id, editor).into_response())
}

fn dashboard_view(
    style: BreakdownStyle,
    overview: &MonthOverview,
    view_id: PageViewId,
    editor: &CategoryEditor,
) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="w-full text-3xl font-bold mb-6" { "Finance Dashboard" }

            (summary_cards_view(&overview.summary))

            div class="w-full grid grid-cols-1 lg:grid-cols-2 gap-4 mb-6"
            {
                (income_vs_expenses_view(&overview.summary))

                (breakdown_view(style, &overview.totals, &overview.months, &overview.active_month))
            }

            (transactions_table_view(view_id, editor, ""))
        }
    );

    let scripts = if style == BreakdownStyle::Donut && !overview.totals.is_empty() {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(&[DashboardChart {
                id: DONUT_CHART_ID,
                options: spending_donut_chart(&overview.totals).to_string(),
            }]),
        ]
    } else {
        Vec::new()
    };

    base("Dashboard", &scripts, &content)
}
