use std::time::Duration;

use async_trait::async_trait;

use crate::{
    store::{StoreError, TransactionStore},
    transaction::{Category, Transaction},
};

/// A store that answers every request with a server error.
pub(crate) struct FailingStore;

#[async_trait]
impl TransactionStore for FailingStore {
    async fn get_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::Status {
            status: 500,
            message: "database is down".to_owned(),
        })
    }

    async fn update_category(
        &self,
        _transaction_id: &str,
        _category: Category,
    ) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::Status {
            status: 500,
            message: "database is down".to_owned(),
        })
    }
}

/// A store that takes `delay` to answer and never finds any rows.
pub(crate) struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl TransactionStore for SlowStore {
    async fn get_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn update_category(
        &self,
        _transaction_id: &str,
        _category: Category,
    ) -> Result<Vec<Transaction>, StoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}
