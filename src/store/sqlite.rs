//! A transaction store backed by a local SQLite database.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use rusqlite::{Connection, Row, params};

use crate::{
    store::{StoreError, TransactionStore},
    transaction::{Category, Transaction, TransactionBuilder},
};

const SELECT_COLUMNS: &str =
    "id, truelayer_id, date, amount, description, merchant_name, category, is_income";

/// Keeps the `transactions` table in SQLite.
///
/// Used for local development with the seed data from `create_test_db` and in tests.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a store from an open connection, creating the table if needed.
    pub fn new(connection: Connection) -> Result<Self, StoreError> {
        create_transactions_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::new(Connection::open(path)?)
    }

    /// Create a store with a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Insert a transaction and return it with its assigned ID.
    pub fn insert(&self, builder: TransactionBuilder) -> Result<Transaction, StoreError> {
        let connection = self.lock()?;

        let mut statement = connection.prepare(&format!(
            "INSERT INTO transactions \
            (truelayer_id, date, amount, description, merchant_name, category, is_income) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
            RETURNING {SELECT_COLUMNS}"
        ))?;

        let transaction = statement.query_row(
            params![
                builder.external_id,
                builder.date,
                builder.amount,
                builder.description,
                builder.merchant_name,
                builder.category,
                builder.is_income,
            ],
            map_transaction_row,
        )?;

        Ok(transaction)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| StoreError::DatabaseLock)
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn get_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let connection = self.lock()?;

        let mut statement = connection.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions ORDER BY date DESC, id DESC"
        ))?;

        let transactions = statement
            .query_map([], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    async fn update_category(
        &self,
        transaction_id: &str,
        category: Category,
    ) -> Result<Vec<Transaction>, StoreError> {
        let connection = self.lock()?;

        let mut statement = connection.prepare(&format!(
            "UPDATE transactions SET category = ?1 \
            WHERE truelayer_id = ?2 OR CAST(id AS TEXT) = ?2 \
            RETURNING {SELECT_COLUMNS}"
        ))?;

        let updated = statement
            .query_map(params![category.as_str(), transaction_id], map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;

        if updated.is_empty() {
            tracing::warn!("No transaction matched the ID \"{transaction_id}\"");
        }

        Ok(updated)
    }
}

fn create_transactions_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                truelayer_id TEXT UNIQUE,
                date TEXT NOT NULL,
                amount REAL NOT NULL DEFAULT 0,
                description TEXT,
                merchant_name TEXT,
                category TEXT,
                is_income INTEGER NOT NULL DEFAULT 0
            )",
        (),
    )?;

    // Improves the performance of the ordered full scan used by the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date)",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let description: Option<String> = row.get(4)?;

    Ok(Transaction {
        id: id.to_string(),
        external_id: row
            .get::<_, Option<String>>(1)?
            .filter(|external_id| !external_id.trim().is_empty()),
        date: row.get(2)?,
        amount: row.get(3)?,
        description: description.unwrap_or_default(),
        merchant_name: row.get(5)?,
        category: row.get(6)?,
        is_income: row.get(7)?,
    })
}
