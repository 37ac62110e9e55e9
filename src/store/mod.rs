//! Persistence for transactions.
//!
//! The dashboard only ever reads every transaction and writes back a single
//! field, so the store interface is deliberately small. [RestStore] talks to
//! the hosted table over HTTP and [SqliteStore] keeps the same table in a
//! local SQLite file.

mod rest;
mod sqlite;

use std::time::Duration;

use async_trait::async_trait;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::transaction::{Category, Transaction};

/// The errors that may occur when reading from or writing to a store.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The store answered with an unsuccessful status code.
    #[error("the store responded with status {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The error message reported by the store.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("could not parse the store response: {0}")]
    InvalidResponse(String),

    /// An unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// The store did not answer within the allowed time.
    #[error("the store did not respond within {0:?}")]
    Timeout(Duration),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        StoreError::Sql(error.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            StoreError::InvalidResponse(error.to_string())
        } else {
            StoreError::Request(error.to_string())
        }
    }
}

/// Reads transactions and updates their category.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Get every transaction, most recent first.
    async fn get_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Set the category of the transaction whose external ID or primary key
    /// equals `transaction_id`.
    ///
    /// Returns the updated rows, which is empty when nothing matched.
    async fn update_category(
        &self,
        transaction_id: &str,
        category: Category,
    ) -> Result<Vec<Transaction>, StoreError>;
}
