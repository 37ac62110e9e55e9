//! The 500 page shown when the dashboard cannot be rendered.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Why the dashboard could not be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalServerError {
    /// The shared page view state could not be locked.
    PageState,
    /// Any other error, logged on the server.
    Unexpected,
}

impl InternalServerError {
    fn description(self) -> &'static str {
        match self {
            InternalServerError::PageState => "The dashboard lost track of its open pages.",
            InternalServerError::Unexpected => "The dashboard ran into an unexpected problem.",
        }
    }

    fn fix(self) -> &'static str {
        match self {
            InternalServerError::PageState => "Restart the server, then reload the dashboard.",
            InternalServerError::Unexpected => {
                "Reload the dashboard. If it keeps happening, check the server logs."
            }
        }
    }

    pub fn into_html(self) -> Html<String> {
        Html(
            error_view(
                "Internal Server Error",
                "500",
                self.description(),
                self.fix(),
            )
            .into_string(),
        )
    }
}

impl IntoResponse for InternalServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}
