//! Dashboard module
//!
//! Provides the page where a logged in user records entries and sees their
//! history, totals, spending advice and charts.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
