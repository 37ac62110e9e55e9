//! Dashboard module
//!
//! The overview page for one month: summary cards, income against expenses,
//! the spending breakdown and the transaction table with inline category
//! editing.

mod breakdown;
mod cards;
mod charts;
mod editing;
mod handlers;
mod transactions_table;

pub use editing::{get_category_cell, get_edit_category_cell, get_transactions_table, post_category};
pub use handlers::get_dashboard_page;
