//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    category_editor::EditorError,
    html::{connection_pending_view, error_loading_data_view},
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
    page_view::PageViewId,
    store::StoreError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The store URL or access key has not been configured.
    ///
    /// This is a recoverable condition: pages render a placeholder asking
    /// for the connection settings instead of failing.
    #[error("the store connection settings are missing")]
    ConnectionPending,

    /// The transactions could not be read from the store.
    #[error("could not load transactions: {0}")]
    LoadTransactions(StoreError),

    /// The category of a transaction could not be saved to the store.
    #[error("could not update the category: {0}")]
    UpdateCategory(StoreError),

    /// A label that is not one of the allowed categories was given.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The page view was evicted or never existed, e.g. after a server restart.
    #[error("the page view {0} no longer exists")]
    ExpiredPageView(PageViewId),

    /// The category editor rejected the request.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Could not acquire the page view lock.
    #[error("could not acquire the page view lock")]
    PageViewLockError,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::ConnectionPending => connection_pending_view().into_response(),
            Error::LoadTransactions(error) => {
                tracing::error!("Could not load transactions: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_loading_data_view(&error.to_string()),
                )
                    .into_response()
            }
            Error::NotFound => NotFoundError.into_response(),
            Error::PageViewLockError => InternalServerError::PageState.into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::Unexpected.into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::ConnectionPending => (
                StatusCode::SERVICE_UNAVAILABLE,
                Alert::Error {
                    message: "Database Connection Pending".to_owned(),
                    details: "The store URL and access key have not been configured.".to_owned(),
                },
            ),
            Error::ExpiredPageView(_) => (
                StatusCode::GONE,
                Alert::Error {
                    message: "This page is out of date".to_owned(),
                    details: "Reload the page to see the latest transactions.".to_owned(),
                },
            ),
            Error::InvalidCategory(label) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("\"{label}\" is not one of the available categories."),
                },
            ),
            Error::Editor(EditorError::UnknownTransaction(transaction_id)) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find transaction".to_owned(),
                    details: format!(
                        "The transaction \"{transaction_id}\" is not on this page. \
                        Try reloading the page."
                    ),
                },
            ),
            Error::Editor(EditorError::NotEditing(_)) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Could not change category".to_owned(),
                    details: "Click the category before choosing a new one.".to_owned(),
                },
            ),
            Error::Editor(EditorError::SaveInProgress(_)) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Still saving".to_owned(),
                    details: "Wait for the previous change to finish saving.".to_owned(),
                },
            ),
            Error::UpdateCategory(error) => {
                tracing::error!("Could not update category: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Failed to update category".to_owned(),
                        details: "Please try again.".to_owned(),
                    },
                )
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, category_editor::EditorError, store::StoreError};

    #[test]
    fn connection_pending_renders_placeholder_page() {
        let response = Error::ConnectionPending.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn load_failure_is_internal_server_error() {
        let response =
            Error::LoadTransactions(StoreError::Request("offline".to_owned())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn expired_page_view_alert_is_gone() {
        let response = Error::ExpiredPageView(3).into_alert_response();

        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[test]
    fn unknown_transaction_alert_is_not_found() {
        let response =
            Error::Editor(EditorError::UnknownTransaction("x".to_owned())).into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
