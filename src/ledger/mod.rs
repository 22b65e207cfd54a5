//! The expense ledger: dated entries of spending and savings per account.
//!
//! This module contains:
//! - The `ExpenseEntry` model and `ExpenseEntryBuilder` for creating entries
//! - Database functions for adding and listing entries
//! - The endpoint for adding entries from the dashboard form

mod core;
mod create_endpoint;

pub use core::{
    ExpenseEntry, ExpenseEntryBuilder, ExpenseId, add_entry, create_expense_table, list_entries,
};
pub use create_endpoint::add_expense_endpoint;
