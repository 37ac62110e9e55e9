//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/views/{view_id}/transactions',
//! use [format_endpoint].

use serde::Serialize;

/// The dashboard page.
pub const ROOT: &str = "/";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The JSON endpoint for changing the category of a transaction.
pub const UPDATE_CATEGORY_API: &str = "/api/update-category";

/// The transaction table of a page view, filtered by the `q` search query.
pub const PAGE_VIEW_TRANSACTIONS: &str = "/views/{view_id}/transactions";
/// The category cell of a row, switched to the category select box.
pub const PAGE_VIEW_EDIT_CATEGORY: &str = "/views/{view_id}/category/edit";
/// The category cell of a row. GET cancels editing, POST saves a new category.
pub const PAGE_VIEW_CATEGORY: &str = "/views/{view_id}/category";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/views/{view_id}', '{view_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: u64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append `query` to `path` as a URL encoded query string.
///
/// Returns `path` unchanged if `query` cannot be encoded or is empty.
pub fn with_query<T: Serialize>(path: &str, query: &T) -> String {
    match serde_urlencoded::to_string(query) {
        Ok(query_string) if !query_string.is_empty() => format!("{path}?{query_string}"),
        Ok(_) => path.to_owned(),
        Err(error) => {
            tracing::error!("Could not encode query string for {path}: {error}");
            path.to_owned()
        }
    }
}
