//! Implements a struct that holds the state of the web server.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    Error,
    config::{BreakdownStyle, DashboardConfig},
    page_view::PageViews,
    store::TransactionStore,
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// Where transactions are read from and saved to, `None` until the
    /// connection settings have been provided.
    pub store: Option<Arc<dyn TransactionStore>>,

    /// The open page views and their category editors.
    pub page_views: Arc<Mutex<PageViews>>,

    /// How the spending breakdown is drawn.
    pub breakdown: BreakdownStyle,

    /// How long to wait for the store to confirm a category change.
    pub update_timeout: Duration,
}

impl AppState {
    /// Create a new [AppState].
    ///
    /// The store is constructed once by the caller and shared by every request.
    pub fn new(store: Option<Arc<dyn TransactionStore>>, config: DashboardConfig) -> Self {
        Self {
            store,
            page_views: Arc::new(Mutex::new(PageViews::new(config.page_view_capacity))),
            breakdown: config.breakdown,
            update_timeout: config.update_timeout,
        }
    }

    /// The configured store or [Error::ConnectionPending].
    pub(crate) fn store(&self) -> Result<Arc<dyn TransactionStore>, Error> {
        self.store.clone().ok_or(Error::ConnectionPending)
    }

    /// Lock the page views. The guard must not be held across an await.
    pub(crate) fn lock_page_views(&self) -> Result<MutexGuard<'_, PageViews>, Error> {
        self.page_views
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire page view lock: {error}"))
            .map_err(|_| Error::PageViewLockError)
    }
}
