//! Inline category editing for the transaction table.
//!
//! Each row is either viewing its category, editing it (the select box is
//! open) or saving a new one. Changes are applied to the local rows straight
//! away and confirmed or rolled back once the store answers. A failed save
//! reverts the whole list to the last known-good snapshot, not just the
//! affected row.

use std::{collections::HashMap, time::Duration};

use crate::{
    store::{StoreError, TransactionStore},
    transaction::{Category, Transaction},
};

/// The default time to wait for the store to confirm a category change.
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// What a row of the transaction table is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// Showing the category badge.
    Viewing,
    /// Showing the category select box.
    Editing,
    /// Waiting for the store to confirm a new category.
    Saving,
}

/// Reasons the editor refuses a transition.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum EditorError {
    /// No row has the given transaction ID.
    #[error("no transaction with the ID \"{0}\" is on this page")]
    UnknownTransaction(String),

    /// A category was chosen for a row that is not being edited.
    #[error("the transaction \"{0}\" is not being edited")]
    NotEditing(String),

    /// The row is still waiting for a previous change to be saved.
    #[error("the category of transaction \"{0}\" is still being saved")]
    SaveInProgress(String),
}

/// A category change applied locally that still has to be sent to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    /// The ID sent to the store, see [Transaction::key].
    pub transaction_id: String,
    /// The newly selected category.
    pub category: Category,
    /// Tells this save apart from later saves of the same row.
    sequence: u64,
}

/// How a save ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The store confirmed the change and returned the updated rows.
    Saved,
    /// The store accepted the request but no row matched the ID. The row's
    /// category was restored from the snapshot.
    NoMatch,
    /// The store failed or timed out and every row was reverted to the snapshot.
    Failed(StoreError),
}

/// The editable transaction rows of one page view.
#[derive(Debug, Clone)]
pub struct CategoryEditor {
    transactions: Vec<Transaction>,
    /// The rows as last confirmed by the store.
    snapshot: Vec<Transaction>,
    editing: Option<String>,
    /// The rows waiting on the store, with the sequence number of their latest save.
    saving: HashMap<String, u64>,
    next_sequence: u64,
}

impl CategoryEditor {
    /// Create an editor for the fetched `transactions`, all rows viewing.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            snapshot: transactions.clone(),
            transactions,
            editing: None,
            saving: HashMap::new(),
            next_sequence: 0,
        }
    }

    /// The rows including changes that have not been confirmed yet.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The last known-good rows.
    #[cfg(test)]
    pub fn snapshot(&self) -> &[Transaction] {
        &self.snapshot
    }

    /// The row with the key `transaction_id`.
    pub fn transaction(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.key() == transaction_id)
    }

    /// The state of the row with the key `transaction_id`.
    pub fn row_state(&self, transaction_id: &str) -> RowState {
        if self.saving.contains_key(transaction_id) {
            RowState::Saving
        } else if self.editing.as_deref() == Some(transaction_id) {
            RowState::Editing
        } else {
            RowState::Viewing
        }
    }

    /// Start editing a row.
    ///
    /// Any other row being edited goes back to viewing and its key is returned
    /// so the caller can redraw it.
    pub fn begin_edit(&mut self, transaction_id: &str) -> Result<Option<String>, EditorError> {
        self.check_known(transaction_id)?;

        if self.saving.contains_key(transaction_id) {
            return Err(EditorError::SaveInProgress(transaction_id.to_owned()));
        }

        let previous = self.editing.replace(transaction_id.to_owned());

        Ok(previous.filter(|previous| previous != transaction_id))
    }

    /// Stop editing a row without changing its category.
    pub fn cancel_edit(&mut self, transaction_id: &str) -> Result<(), EditorError> {
        self.check_known(transaction_id)?;

        if self.editing.as_deref() == Some(transaction_id) {
            self.editing = None;
        }

        Ok(())
    }

    /// Apply `category` to the row being edited and start saving it.
    pub fn select_category(
        &mut self,
        transaction_id: &str,
        category: Category,
    ) -> Result<PendingSave, EditorError> {
        self.check_known(transaction_id)?;

        if self.saving.contains_key(transaction_id) {
            return Err(EditorError::SaveInProgress(transaction_id.to_owned()));
        }

        if self.editing.as_deref() != Some(transaction_id) {
            return Err(EditorError::NotEditing(transaction_id.to_owned()));
        }

        for transaction in self
            .transactions
            .iter_mut()
            .filter(|transaction| transaction.key() == transaction_id)
        {
            transaction.category = Some(category.as_str().to_owned());
        }

        self.next_sequence += 1;
        self.editing = None;
        self.saving.insert(transaction_id.to_owned(), self.next_sequence);

        Ok(PendingSave {
            transaction_id: transaction_id.to_owned(),
            category,
            sequence: self.next_sequence,
        })
    }

    /// Finish a save with the store's answer.
    ///
    /// If the row has been saved again since `pending` was sent, a successful
    /// answer only updates the snapshot. The row keeps showing the newer
    /// category and stays in the saving state until its own answer arrives.
    pub fn complete_save(
        &mut self,
        pending: &PendingSave,
        result: Result<Vec<Transaction>, StoreError>,
    ) -> SaveOutcome {
        let superseded = self
            .saving
            .get(&pending.transaction_id)
            .is_some_and(|&sequence| sequence != pending.sequence);

        if !superseded {
            self.saving.remove(&pending.transaction_id);
        }

        match result {
            Ok(updated) if !updated.is_empty() => {
                for row in updated {
                    merge_row(&mut self.snapshot, &row);

                    if !superseded {
                        merge_row(&mut self.transactions, &row);
                    }
                }

                SaveOutcome::Saved
            }
            Ok(_) if superseded => {
                tracing::warn!(
                    "An earlier save of \"{}\" did not update any rows",
                    pending.transaction_id
                );

                SaveOutcome::NoMatch
            }
            Ok(_) => {
                tracing::warn!(
                    "Saving the category of \"{}\" did not update any rows, restoring it",
                    pending.transaction_id
                );
                let confirmed = self
                    .snapshot
                    .iter()
                    .find(|transaction| transaction.key() == pending.transaction_id)
                    .map(|transaction| transaction.category.clone());

                if let Some(category) = confirmed {
                    for transaction in self
                        .transactions
                        .iter_mut()
                        .filter(|transaction| transaction.key() == pending.transaction_id)
                    {
                        transaction.category = category.clone();
                    }
                }

                SaveOutcome::NoMatch
            }
            Err(error) => {
                tracing::error!(
                    "Could not save the category of \"{}\": {error}",
                    pending.transaction_id
                );
                self.transactions = self.snapshot.clone();
                self.editing = None;
                self.saving.clear();

                SaveOutcome::Failed(error)
            }
        }
    }

    fn check_known(&self, transaction_id: &str) -> Result<(), EditorError> {
        match self.transaction(transaction_id) {
            Some(_) => Ok(()),
            None => Err(EditorError::UnknownTransaction(transaction_id.to_owned())),
        }
    }
}

/// Replace the row that has the same primary key as `updated`.
fn merge_row(rows: &mut [Transaction], updated: &Transaction) {
    if let Some(row) = rows.iter_mut().find(|row| row.id == updated.id) {
        *row = updated.clone();
    }
}

/// Send a pending change to the store, giving up after `timeout`.
pub async fn persist(
    store: &dyn TransactionStore,
    pending: &PendingSave,
    timeout: Duration,
) -> Result<Vec<Transaction>, StoreError> {
    match tokio::time::timeout(
        timeout,
        store.update_category(&pending.transaction_id, pending.category),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                "Timed out after {timeout:?} saving the category of \"{}\"",
                pending.transaction_id
            );
            Err(StoreError::Timeout(timeout))
        }
    }
}
