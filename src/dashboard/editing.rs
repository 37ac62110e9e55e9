//! Route handlers for the htmx requests of the transaction table: search and
//! inline category editing.
//!
//! These handlers answer with HTML fragments. Errors are rendered as alerts
//! targeted at `#alert-container`.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRetarget;
use maud::html;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    alert::Alert,
    category_editor::{RowState, SaveOutcome, persist},
    dashboard::transactions_table::{
        TRANSACTIONS_TABLE_ID, category_cell_oob_view, category_cell_view,
        transaction_results_view, transactions_table_view,
    },
    page_view::PageViewId,
    transaction::Category,
};

/// The event dispatched in the browser when a category could not be saved.
pub(crate) const SAVE_FAILED_EVENT: &str = "categorySaveFailed";

const SAVE_FAILED_MESSAGE: &str = "Failed to update category. Your changes have been reverted.";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryCellQuery {
    transaction_id: String,
}

/// The form sent when a category is chosen from the select box.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    transaction_id: String,
    category: String,
    /// The search query of the table, used to redraw it after a failed save.
    #[serde(default)]
    q: String,
}

/// Render the search results of a page view's table.
pub async fn get_transactions_table(
    State(state): State<AppState>,
    Path(view_id): Path<PageViewId>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let page_views = match state.lock_page_views() {
        Ok(page_views) => page_views,
        Err(error) => return error.into_alert_response(),
    };

    match page_views.get(view_id) {
        Some(editor) => transaction_results_view(view_id, editor, &query.q).into_response(),
        None => Error::ExpiredPageView(view_id).into_alert_response(),
    }
}

/// Switch a row's category cell to the select box.
pub async fn get_edit_category_cell(
    State(state): State<AppState>,
    Path(view_id): Path<PageViewId>,
    Query(query): Query<CategoryCellQuery>,
) -> Response {
    edit_category_cell(&state, view_id, &query.transaction_id)
        .unwrap_or_else(Error::into_alert_response)
}

fn edit_category_cell(
    state: &AppState,
    view_id: PageViewId,
    transaction_id: &str,
) -> Result<Response, Error> {
    let mut page_views = state.lock_page_views()?;
    let editor = page_views
        .get_mut(view_id)
        .ok_or(Error::ExpiredPageView(view_id))?;

    let previous = editor.begin_edit(transaction_id)?;

    let previous_row = previous
        .as_deref()
        .and_then(|previous| editor.transaction(previous));
    let row = editor
        .transaction(transaction_id)
        .ok_or(Error::NotFound)?;

    Ok(html! {
        (category_cell_view(view_id, row, editor.row_state(transaction_id)))

        @if let Some(previous_row) = previous_row {
            (category_cell_oob_view(view_id, previous_row))
        }
    }
    .into_response())
}

/// Close a row's select box without changing the category.
///
/// A row that is being saved is left alone with `204 No Content`. The save
/// request swaps in the row's cell once the store answers.
pub async fn get_category_cell(
    State(state): State<AppState>,
    Path(view_id): Path<PageViewId>,
    Query(query): Query<CategoryCellQuery>,
) -> Response {
    cancel_category_edit(&state, view_id, &query.transaction_id)
        .unwrap_or_else(Error::into_alert_response)
}

fn cancel_category_edit(
    state: &AppState,
    view_id: PageViewId,
    transaction_id: &str,
) -> Result<Response, Error> {
    let mut page_views = state.lock_page_views()?;
    let editor = page_views
        .get_mut(view_id)
        .ok_or(Error::ExpiredPageView(view_id))?;

    editor.cancel_edit(transaction_id)?;

    if editor.row_state(transaction_id) == RowState::Saving {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let row = editor
        .transaction(transaction_id)
        .ok_or(Error::NotFound)?;

    Ok(category_cell_view(view_id, row, editor.row_state(transaction_id)).into_response())
}

/// Save the category chosen for a row.
///
/// The change is shown straight away and sent to the store. If the store
/// fails or times out, every row of the page view is reverted and the whole
/// table is redrawn along with an alert.
pub async fn post_category(
    State(state): State<AppState>,
    Path(view_id): Path<PageViewId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    save_category(state, view_id, form)
        .await
        .unwrap_or_else(Error::into_alert_response)
}

async fn save_category(
    state: AppState,
    view_id: PageViewId,
    form: CategoryForm,
) -> Result<Response, Error> {
    let category: Category = form.category.parse()?;
    let store = state.store()?;

    let pending = {
        let mut page_views = state.lock_page_views()?;
        let editor = page_views
            .get_mut(view_id)
            .ok_or(Error::ExpiredPageView(view_id))?;

        editor.select_category(&form.transaction_id, category)?
    };

    let result = persist(store.as_ref(), &pending, state.update_timeout).await;

    let mut page_views = state.lock_page_views()?;
    let editor = page_views
        .get_mut(view_id)
        .ok_or(Error::ExpiredPageView(view_id))?;

    let outcome = editor.complete_save(&pending, result);
    let transaction_id = pending.transaction_id.as_str();

    match outcome {
        SaveOutcome::Saved => {
            tracing::info!("Set the category of \"{transaction_id}\" to {category}");
            let row = editor.transaction(transaction_id).ok_or(Error::NotFound)?;

            Ok(category_cell_view(view_id, row, editor.row_state(transaction_id)).into_response())
        }
        SaveOutcome::NoMatch => {
            let row = editor.transaction(transaction_id).ok_or(Error::NotFound)?;
            let alert = Alert::Error {
                message: "Category not saved".to_owned(),
                details: "No stored transaction matched this row. Try reloading the page."
                    .to_owned(),
            };

            Ok(html! {
                (category_cell_view(view_id, row, editor.row_state(transaction_id)))
                (alert.into_oob_markup())
            }
            .into_response())
        }
        SaveOutcome::Failed(_) => {
            let alert = Alert::Error {
                message: "Failed to update category".to_owned(),
                details: "Your changes have been reverted. Please try again.".to_owned(),
            };
            let trigger = json!({ SAVE_FAILED_EVENT: SAVE_FAILED_MESSAGE }).to_string();

            Ok((
                HxRetarget(format!("#{TRANSACTIONS_TABLE_ID}")),
                [("HX-Trigger", trigger)],
                html! {
                    (transactions_table_view(view_id, editor, &form.q))
                    (alert.into_oob_markup())
                },
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod editing_tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Form,
        extract::{Path, Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        AppState,
        config::DashboardConfig,
        store::{SqliteStore, TransactionStore},
        test_utils::{
            FailingStore, SlowStore, assert_valid_html, get_header, parse_html_fragment,
            parse_table_cells,
        },
        transaction::{Transaction, TransactionBuilder},
    };

    use super::{
        CategoryCellQuery, CategoryForm, SearchQuery, get_category_cell, get_edit_category_cell,
        get_transactions_table, post_category,
    };

    fn rows() -> [TransactionBuilder; 2] {
        [
            Transaction::build(-42.0, "2025-01-05", "Power bill")
                .external_id("tx123")
                .category("Shopping"),
            Transaction::build(-3.0, "2025-01-04", "Coffee Shop")
                .external_id("tx456")
                .category("Dining"),
        ]
    }

    fn transactions() -> Vec<Transaction> {
        rows()
            .into_iter()
            .zip(["1", "2"])
            .map(|(row, id)| row.finalize(id))
            .collect()
    }

    fn state_with_store(store: Arc<dyn TransactionStore>) -> (AppState, u64) {
        let config = DashboardConfig {
            update_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let state = AppState::new(Some(store), config);
        let view_id = state.page_views.lock().unwrap().open(transactions());

        (state, view_id)
    }

    fn sqlite_state() -> (AppState, u64) {
        let store = SqliteStore::open_in_memory().unwrap();
        for row in rows() {
            store.insert(row).unwrap();
        }

        state_with_store(Arc::new(store))
    }

    fn cell_query(transaction_id: &str) -> Query<CategoryCellQuery> {
        Query(CategoryCellQuery {
            transaction_id: transaction_id.to_owned(),
        })
    }

    fn category_form(transaction_id: &str, category: &str) -> Form<CategoryForm> {
        Form(CategoryForm {
            transaction_id: transaction_id.to_owned(),
            category: category.to_owned(),
            q: String::new(),
        })
    }

    async fn begin_edit(state: &AppState, view_id: u64, transaction_id: &str) {
        let response = get_edit_category_cell(
            State(state.clone()),
            Path(view_id),
            cell_query(transaction_id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    fn local_category(state: &AppState, view_id: u64, transaction_id: &str) -> Option<String> {
        state
            .page_views
            .lock()
            .unwrap()
            .get(view_id)
            .unwrap()
            .transaction(transaction_id)
            .unwrap()
            .category
            .clone()
    }

    #[tokio::test]
    async fn search_filters_rows() {
        let (state, view_id) = sqlite_state();

        let response = get_transactions_table(
            State(state),
            Path(view_id),
            Query(SearchQuery {
                q: "COF".to_owned(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let rows = html
            .select(&Selector::parse("tbody tr").unwrap())
            .count();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn unknown_page_view_is_gone() {
        let (state, _) = sqlite_state();

        let response = get_transactions_table(
            State(state),
            Path(999),
            Query(SearchQuery { q: String::new() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn edit_renders_select_and_closes_previous_row() {
        let (state, view_id) = sqlite_state();
        begin_edit(&state, view_id, "tx123").await;

        let response =
            get_edit_category_cell(State(state.clone()), Path(view_id), cell_query("tx456")).await;

        let html = parse_table_cells(response).await;
        assert_valid_html(&html);
        assert_eq!(
            html.select(&Selector::parse("select[name=category]").unwrap())
                .count(),
            1
        );
        assert_eq!(
            html.select(&Selector::parse("td[hx-swap-oob]").unwrap())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn edit_unknown_row_is_not_found() {
        let (state, view_id) = sqlite_state();

        let response =
            get_edit_category_cell(State(state), Path(view_id), cell_query("nope")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cancel_restores_badge() {
        let (state, view_id) = sqlite_state();
        begin_edit(&state, view_id, "tx123").await;

        let response =
            get_category_cell(State(state.clone()), Path(view_id), cell_query("tx123")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_table_cells(response).await;
        let badge: String = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(badge.trim(), "Shopping");
    }

    #[tokio::test]
    async fn cancel_while_saving_leaves_cell_alone() {
        let (state, view_id) = state_with_store(Arc::new(SlowStore {
            delay: Duration::from_millis(20),
        }));
        begin_edit(&state, view_id, "tx123").await;
        let save = tokio::spawn(post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx123", "Bills"),
        ));
        tokio::time::sleep(Duration::from_millis(5)).await;

        let response =
            get_category_cell(State(state.clone()), Path(view_id), cell_query("tx123")).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = save.await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_table_cells(response).await;
        assert!(
            html.select(&Selector::parse("td button").unwrap())
                .next()
                .is_some()
        );

        let response =
            get_category_cell(State(state.clone()), Path(view_id), cell_query("tx123")).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn successful_save_updates_row() {
        let (state, view_id) = sqlite_state();
        begin_edit(&state, view_id, "tx123").await;

        let response = post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx123", "Bills"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            local_category(&state, view_id, "tx123").as_deref(),
            Some("Bills")
        );
        let stored = state.store.clone().unwrap().get_transactions().await.unwrap();
        let saved = stored.iter().find(|t| t.key() == "tx123").unwrap();
        assert_eq!(saved.category.as_deref(), Some("Bills"));
    }

    #[tokio::test]
    async fn save_without_editing_is_conflict() {
        let (state, view_id) = sqlite_state();

        let response = post_category(
            State(state),
            Path(view_id),
            category_form("tx123", "Bills"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_category_is_bad_request() {
        let (state, view_id) = sqlite_state();
        begin_edit(&state, view_id, "tx123").await;

        let response = post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx123", "Holidays"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            local_category(&state, view_id, "tx123").as_deref(),
            Some("Shopping")
        );
    }

    #[tokio::test]
    async fn failed_save_reverts_and_triggers_alert() {
        let (state, view_id) = state_with_store(Arc::new(FailingStore));
        begin_edit(&state, view_id, "tx123").await;

        let response = post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx123", "Bills"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-retarget"), "#transactions-table");
        assert!(get_header(&response, "hx-trigger").contains("categorySaveFailed"));
        assert_eq!(
            local_category(&state, view_id, "tx123").as_deref(),
            Some("Shopping")
        );

        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("#transactions-table").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#alert-container").unwrap())
                .next()
                .is_some()
        );
    }

    #[tokio::test]
    async fn slow_store_times_out_and_reverts() {
        let (state, view_id) = state_with_store(Arc::new(SlowStore {
            delay: Duration::from_secs(5),
        }));
        begin_edit(&state, view_id, "tx456").await;

        let response = post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx456", "Groceries"),
        )
        .await;

        assert!(get_header(&response, "hx-trigger").contains("categorySaveFailed"));
        assert_eq!(
            local_category(&state, view_id, "tx456").as_deref(),
            Some("Dining")
        );
    }

    #[tokio::test]
    async fn unmatched_save_restores_row_and_warns() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (state, view_id) = state_with_store(Arc::new(store));
        begin_edit(&state, view_id, "tx123").await;

        let response = post_category(
            State(state.clone()),
            Path(view_id),
            category_form("tx123", "Bills"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            local_category(&state, view_id, "tx123").as_deref(),
            Some("Shopping")
        );
        let html = parse_table_cells(response).await;
        let alert: String = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert!(alert.contains("Category not saved"));
    }
}
