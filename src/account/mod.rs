//! The account store: user identities with credentials and a monthly salary.

mod core;

pub use core::{
    Account, AccountId, Username, authenticate, count_accounts, create_account,
    create_account_table, find_account_for_log_in, get_account, get_account_by_username,
    update_password, verify_log_in,
};
