//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{
        get_category_cell, get_dashboard_page, get_edit_category_cell, get_transactions_table,
        post_category,
    },
    endpoints,
    not_found::get_404_not_found,
    update_category::update_category,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new().route(endpoints::ROOT, get(get_dashboard_page));

    // The htmx partials of the transaction table, scoped to a page view.
    let table_routes = Router::new()
        .route(
            endpoints::PAGE_VIEW_TRANSACTIONS,
            get(get_transactions_table),
        )
        .route(
            endpoints::PAGE_VIEW_EDIT_CATEGORY,
            get(get_edit_category_cell),
        )
        .route(
            endpoints::PAGE_VIEW_CATEGORY,
            get(get_category_cell).post(post_category),
        );

    let api_routes = Router::new().route(endpoints::UPDATE_CATEGORY_API, post(update_category));

    page_routes
        .merge(table_routes)
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
