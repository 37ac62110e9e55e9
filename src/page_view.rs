//! The server side state of each rendered dashboard page.
//!
//! Category edits are scoped to the page they were made on, so every render
//! of the dashboard opens a new page view holding its own [CategoryEditor].
//! Only the most recent page views are kept.

use std::collections::VecDeque;

use crate::{category_editor::CategoryEditor, transaction::Transaction};

/// Identifies a page view in URLs such as `/views/{view_id}/transactions`.
pub type PageViewId = u64;

/// The default number of page views to keep.
pub const DEFAULT_PAGE_VIEW_CAPACITY: usize = 64;

/// A bounded registry of open page views, evicting the oldest first.
#[derive(Debug)]
pub struct PageViews {
    capacity: usize,
    next_id: PageViewId,
    views: VecDeque<(PageViewId, CategoryEditor)>,
}

impl PageViews {
    /// Create a registry that holds at most `capacity` page views.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            capacity,
            next_id: 1,
            views: VecDeque::with_capacity(capacity),
        }
    }

    /// Open a page view for `transactions` and return its ID.
    pub fn open(&mut self, transactions: Vec<Transaction>) -> PageViewId {
        while self.views.len() >= self.capacity {
            if let Some((evicted_id, _)) = self.views.pop_front() {
                tracing::debug!("Evicted page view {evicted_id}");
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.views.push_back((id, CategoryEditor::new(transactions)));

        id
    }

    /// The editor of the page view `id`, if it is still open.
    pub fn get(&self, id: PageViewId) -> Option<&CategoryEditor> {
        self.views
            .iter()
            .find(|(view_id, _)| *view_id == id)
            .map(|(_, editor)| editor)
    }

    /// The editor of the page view `id` for making changes, if it is still open.
    pub fn get_mut(&mut self, id: PageViewId) -> Option<&mut CategoryEditor> {
        self.views
            .iter_mut()
            .find(|(view_id, _)| *view_id == id)
            .map(|(_, editor)| editor)
    }

    /// The number of open page views.
    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }
}

impl Default for PageViews {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_VIEW_CAPACITY)
    }
}
