//! Database schema set up for the application.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, account::create_account_table, ledger::create_expense_table};

/// Create all the tables used by the application if they do not exist.
///
/// Foreign key enforcement is switched on for `connection` so that expense
/// entries cannot refer to accounts that do not exist.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created. No
/// tables are created if an error is returned.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
