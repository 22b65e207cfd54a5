//! Defines the expense entry model and the database queries for the ledger.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The ID of an expense entry.
pub type ExpenseId = i64;

/// One day's record of spending and savings for a single account.
///
/// To create a new `ExpenseEntry`, use [ExpenseEntry::build] and [add_entry].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// The ID of the entry, which also gives the order entries were added in.
    pub id: ExpenseId,
    /// The username of the account the entry belongs to.
    pub username: String,
    /// The day the money was spent or saved.
    pub date: Date,
    /// Money spent on food.
    pub food: f64,
    /// Money spent on fuel.
    pub fuel: f64,
    /// Money spent on groceries.
    pub groceries: f64,
    /// Money spent on anything else.
    pub other: f64,
    /// Money put aside as savings.
    pub savings: f64,
}

impl ExpenseEntry {
    /// Start building a new entry for `date` with every amount set to zero.
    ///
    /// Shortcut for [ExpenseEntryBuilder] for discoverability.
    pub fn build(date: Date) -> ExpenseEntryBuilder {
        ExpenseEntryBuilder {
            date,
            food: 0.0,
            fuel: 0.0,
            groceries: 0.0,
            other: 0.0,
            savings: 0.0,
        }
    }

    /// The money spent across all four spending categories.
    ///
    /// Savings are not an expense and are not included.
    pub fn expenses(&self) -> f64 {
        self.food + self.fuel + self.groceries + self.other
    }
}

/// A builder for creating [ExpenseEntry] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::ledger::ExpenseEntry;
///
/// let builder = ExpenseEntry::build(date!(2025 - 01 - 15))
///     .food(250.0)
///     .fuel(100.0)
///     .savings(1_000.0);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseEntryBuilder {
    /// The day the money was spent or saved.
    pub date: Date,
    /// Money spent on food.
    pub food: f64,
    /// Money spent on fuel.
    pub fuel: f64,
    /// Money spent on groceries.
    pub groceries: f64,
    /// Money spent on anything else.
    pub other: f64,
    /// Money put aside as savings.
    pub savings: f64,
}

impl ExpenseEntryBuilder {
    /// Set the amount spent on food.
    pub fn food(mut self, food: f64) -> Self {
        self.food = food;
        self
    }

    /// Set the amount spent on fuel.
    pub fn fuel(mut self, fuel: f64) -> Self {
        self.fuel = fuel;
        self
    }

    /// Set the amount spent on groceries.
    pub fn groceries(mut self, groceries: f64) -> Self {
        self.groceries = groceries;
        self
    }

    /// Set the amount spent on anything else.
    pub fn other(mut self, other: f64) -> Self {
        self.other = other;
        self
    }

    /// Set the amount saved.
    pub fn savings(mut self, savings: f64) -> Self {
        self.savings = savings;
        self
    }

    /// Check that every amount is a finite number that is zero or greater.
    ///
    /// # Errors
    /// Returns an [Error::NegativeAmount] naming the first offending field.
    fn validate(&self) -> Result<(), Error> {
        let amounts = [
            ("food", self.food),
            ("fuel", self.fuel),
            ("groceries", self.groceries),
            ("other", self.other),
            ("savings", self.savings),
        ];

        match amounts
            .into_iter()
            .find(|(_, amount)| !amount.is_finite() || *amount < 0.0)
        {
            Some((field, _)) => Err(Error::NegativeAmount(field)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Append a new entry for the account `username` to the ledger.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if any amount is negative or not a finite number,
/// - [Error::UnknownAccount] if no account has the name `username`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn add_entry(
    username: &str,
    builder: ExpenseEntryBuilder,
    connection: &Connection,
) -> Result<ExpenseEntry, Error> {
    builder.validate()?;

    connection
        .prepare(
            "INSERT INTO expenses (username, date, food, fuel, groceries, other, savings)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, username, date, food, fuel, groceries, other, savings",
        )?
        .query_row(
            (
                username,
                builder.date,
                builder.food,
                builder.fuel,
                builder.groceries,
                builder.other,
                builder.savings,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::UnknownAccount(username.to_owned()),
            error => error.into(),
        })
}

/// Get every entry belonging to `username` in the order they were added.
///
/// Returns an empty vector if the account has no entries or does not exist.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_entries(username: &str, connection: &Connection) -> Result<Vec<ExpenseEntry>, Error> {
    connection
        .prepare(
            "SELECT id, username, date, food, fuel, groceries, other, savings
             FROM expenses
             WHERE username = :username
             ORDER BY id ASC",
        )?
        .query_map(&[(":username", &username)], map_expense_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                date TEXT NOT NULL,
                food REAL NOT NULL,
                fuel REAL NOT NULL,
                groceries REAL NOT NULL,
                other REAL NOT NULL,
                savings REAL NOT NULL,
                FOREIGN KEY(username) REFERENCES users(username) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Every ledger query filters by the owning account.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_username ON expenses(username);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [ExpenseEntry].
pub fn map_expense_row(row: &Row) -> Result<ExpenseEntry, rusqlite::Error> {
    Ok(ExpenseEntry {
        id: row.get(0)?,
        username: row.get(1)?,
        date: row.get(2)?,
        food: row.get(3)?,
        fuel: row.get(4)?,
        groceries: row.get(5)?,
        other: row.get(6)?,
        savings: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, PasswordHash,
        account::{Username, create_account},
        db::initialize,
        ledger::{ExpenseEntry, add_entry, list_entries},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for name in ["priya", "arjun"] {
            create_account(
                Username::new_unchecked(name),
                PasswordHash::new_unchecked("not a real hash"),
                30_000.0,
                &conn,
            )
            .unwrap();
        }

        conn
    }

    fn count_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(id) FROM expenses", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn add_then_list_returns_same_fields() {
        let conn = get_test_connection();
        let builder = ExpenseEntry::build(date!(2025 - 03 - 14))
            .food(120.5)
            .fuel(40.0)
            .groceries(310.25)
            .other(0.0)
            .savings(1_500.0);

        let added = add_entry("priya", builder, &conn).unwrap();
        let entries = list_entries("priya", &conn).unwrap();

        assert_eq!(entries, vec![added.clone()]);
        assert_eq!(added.username, "priya");
        assert_eq!(added.date, date!(2025 - 03 - 14));
        assert_eq!(added.food, 120.5);
        assert_eq!(added.fuel, 40.0);
        assert_eq!(added.groceries, 310.25);
        assert_eq!(added.other, 0.0);
        assert_eq!(added.savings, 1_500.0);
    }

    #[test]
    fn list_returns_entries_in_insertion_order() {
        let conn = get_test_connection();
        // Dates deliberately out of order to show ordering is not by date.
        let dates = [
            date!(2025 - 05 - 01),
            date!(2025 - 01 - 01),
            date!(2025 - 03 - 01),
        ];
        for (i, date) in dates.iter().enumerate() {
            add_entry(
                "priya",
                ExpenseEntry::build(*date).food(i as f64),
                &conn,
            )
            .unwrap();
        }

        let first = list_entries("priya", &conn).unwrap();
        let second = list_entries("priya", &conn).unwrap();

        let got_dates: Vec<_> = first.iter().map(|entry| entry.date).collect();
        assert_eq!(got_dates, dates);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_entries_are_kept() {
        let conn = get_test_connection();
        let builder = ExpenseEntry::build(date!(2025 - 03 - 14)).food(10.0);

        add_entry("priya", builder.clone(), &conn).unwrap();
        add_entry("priya", builder, &conn).unwrap();

        assert_eq!(list_entries("priya", &conn).unwrap().len(), 2);
    }

    #[test]
    fn list_only_returns_entries_for_user() {
        let conn = get_test_connection();
        add_entry(
            "priya",
            ExpenseEntry::build(date!(2025 - 03 - 14)).food(10.0),
            &conn,
        )
        .unwrap();
        add_entry(
            "arjun",
            ExpenseEntry::build(date!(2025 - 03 - 15)).fuel(20.0),
            &conn,
        )
        .unwrap();

        let entries = list_entries("arjun", &conn).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|entry| entry.username == "arjun"));
    }

    #[test]
    fn list_for_user_without_entries_is_empty() {
        let conn = get_test_connection();

        assert_eq!(list_entries("priya", &conn).unwrap(), vec![]);
        assert_eq!(list_entries("nobody", &conn).unwrap(), vec![]);
    }

    #[test]
    fn add_fails_on_negative_amount_and_stores_nothing() {
        let conn = get_test_connection();
        let builder = ExpenseEntry::build(date!(2025 - 03 - 14))
            .food(10.0)
            .groceries(-5.0);

        let result = add_entry("priya", builder, &conn);

        assert_eq!(result, Err(Error::NegativeAmount("groceries")));
        assert_eq!(count_rows(&conn), 0);
    }

    #[test]
    fn add_fails_on_infinite_amount() {
        let conn = get_test_connection();
        let builder = ExpenseEntry::build(date!(2025 - 03 - 14)).savings(f64::INFINITY);

        let result = add_entry("priya", builder, &conn);

        assert_eq!(result, Err(Error::NegativeAmount("savings")));
    }

    #[test]
    fn add_fails_on_unknown_account() {
        let conn = get_test_connection();
        let builder = ExpenseEntry::build(date!(2025 - 03 - 14)).food(10.0);

        let result = add_entry("nobody", builder, &conn);

        assert_eq!(result, Err(Error::UnknownAccount("nobody".to_owned())));
        assert_eq!(count_rows(&conn), 0);
    }

    #[test]
    fn all_zero_entry_is_allowed() {
        let conn = get_test_connection();

        let entry = add_entry("priya", ExpenseEntry::build(date!(2025 - 03 - 14)), &conn).unwrap();

        assert_eq!(entry.expenses(), 0.0);
        assert_eq!(entry.savings, 0.0);
    }
}
