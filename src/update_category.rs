//! The JSON endpoint for changing the category of a transaction.
//!
//! The body is parsed by hand rather than with the `Json` extractor so that
//! every malformed request gets the same JSON error shape.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, Error, transaction::Category};

/// The fields expected in the request body.
///
/// Both are optional here so that missing and null values can be reported
/// with a specific message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCategoryRequest {
    #[serde(default)]
    transaction_id: Option<Value>,
    #[serde(default)]
    category: Option<String>,
}

/// Set the category of the transaction whose ID or external ID is
/// `transactionId`.
///
/// Answers with the updated rows, e.g. `{"success": true, "data": [...]}`.
pub async fn update_category(State(state): State<AppState>, body: Bytes) -> Response {
    let request: UpdateCategoryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::error!("Could not parse update category request: {error}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let (Some(transaction_id), Some(category)) = (
        request.transaction_id.as_ref().and_then(transaction_id_text),
        request.category.filter(|category| !category.is_empty()),
    ) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing transactionId or category");
    };

    let category: Category = match category.parse() {
        Ok(category) => category,
        Err(Error::InvalidCategory(label)) => {
            tracing::warn!("Rejected category update with invalid category \"{label}\"");
            return json_error(StatusCode::BAD_REQUEST, "Invalid category");
        }
        Err(error) => {
            tracing::error!("Could not parse category: {error}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid category");
        }
    };

    let result = match state.store() {
        Ok(store) => store
            .update_category(&transaction_id, category)
            .await
            .map_err(Error::UpdateCategory),
        Err(error) => Err(error),
    };

    match result {
        Ok(updated) => {
            tracing::info!(
                "Set the category of \"{transaction_id}\" to {category}, {} row(s) updated",
                updated.len()
            );
            Json(json!({ "success": true, "data": updated })).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update category: {error}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update category")
        }
    }
}

/// Accept both string and numeric IDs, treating empty strings as missing.
fn transaction_id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn json_error(status_code: StatusCode, message: &str) -> Response {
    (status_code, Json(json!({ "error": message }))).into_response()
}
