//! A personal finance dashboard.
//!
//! Reads bank transactions from a store and serves a single page with
//! monthly income and spending summaries, a per-category breakdown and a
//! searchable transaction table whose categories can be edited inline.
//!
//! This library provides a web server that directly serves HTML pages, plus
//! a small JSON API for changing the category of a transaction.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod category_editor;
mod config;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod page_view;
mod routing;
mod search;
mod store;
mod transaction;
mod update_category;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category_editor::DEFAULT_UPDATE_TIMEOUT;
pub use config::{BreakdownStyle, DashboardConfig, StoreConfig};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use page_view::DEFAULT_PAGE_VIEW_CAPACITY;
pub use routing::build_router;
pub use store::{RestStore, SqliteStore, StoreError, TransactionStore};
pub use transaction::{Category, Transaction, TransactionBuilder};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
