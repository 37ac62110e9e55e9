//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the page's `#alert-container`, either as the
//! target of an htmx error response or as an out-of-band swap alongside a
//! regular partial.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// An alert message to show the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error with a headline and a longer explanation.
    Error { message: String, details: String },
}

impl Alert {
    fn markup(&self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Error { message, details } => (
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                details,
            ),
        };

        html! {
            div
                role="alert"
                class={"flex items-start justify-between gap-4 p-4 mb-4 border rounded-lg shadow " (container_style)}
            {
                div
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="text-lg leading-none"
                    onclick="this.closest('#alert-container').classList.add('hidden')"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert as the contents of the alert container.
    pub fn into_html(self) -> Html<String> {
        Html(
            html! {
                (self.markup())
                // The container starts hidden, reveal it once an alert is swapped in.
                script { "document.getElementById('alert-container').classList.remove('hidden');" }
            }
            .into_string(),
        )
    }

    /// Render the alert as an out-of-band swap that replaces the alert container.
    pub fn into_oob_markup(self) -> Markup {
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (self.markup())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
