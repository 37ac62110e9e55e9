//! Settings chosen at startup: where transactions are stored and how the
//! dashboard presents them.

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::ValueEnum;

use crate::{
    category_editor::DEFAULT_UPDATE_TIMEOUT,
    page_view::DEFAULT_PAGE_VIEW_CAPACITY,
    store::{RestStore, SqliteStore, StoreError, TransactionStore},
};

/// How the spending breakdown is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BreakdownStyle {
    /// An ECharts donut chart.
    #[default]
    Donut,
    /// Circles sized by each category's share of spending.
    Bubble,
    /// A table of amounts and shares.
    Table,
}

/// Settings for rendering the dashboard and saving category changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    /// How the spending breakdown is drawn.
    pub breakdown: BreakdownStyle,
    /// How long to wait for the store to confirm a category change.
    pub update_timeout: Duration,
    /// How many page views to keep before evicting the oldest.
    pub page_view_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            breakdown: BreakdownStyle::default(),
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
            page_view_capacity: DEFAULT_PAGE_VIEW_CAPACITY,
        }
    }
}

/// Where the transactions live.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    /// The hosted database, reached over its REST interface.
    Hosted {
        /// The project URL, e.g. "https://abc.supabase.co".
        url: String,
        /// The anonymous access key.
        key: String,
    },
    /// A local SQLite database file.
    Sqlite(PathBuf),
    /// The connection settings are missing.
    Pending,
}

impl StoreConfig {
    /// Pick a store from the command line and environment settings.
    ///
    /// A SQLite path takes precedence. Blank values count as missing, and
    /// the hosted store needs both a URL and a key.
    pub fn from_parts(url: Option<&str>, key: Option<&str>, db_path: Option<PathBuf>) -> Self {
        if let Some(db_path) = db_path {
            return StoreConfig::Sqlite(db_path);
        }

        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        match (non_blank(url), non_blank(key)) {
            (Some(url), Some(key)) => StoreConfig::Hosted { url, key },
            _ => StoreConfig::Pending,
        }
    }

    /// Construct the configured store, or `None` while the connection is pending.
    pub fn connect(&self) -> Result<Option<Arc<dyn TransactionStore>>, StoreError> {
        let store: Arc<dyn TransactionStore> = match self {
            StoreConfig::Hosted { url, key } => Arc::new(RestStore::new(url, key)?),
            StoreConfig::Sqlite(path) => Arc::new(SqliteStore::open(path)?),
            StoreConfig::Pending => return Ok(None),
        };

        Ok(Some(store))
    }
}
