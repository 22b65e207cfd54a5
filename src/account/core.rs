//! Defines the account model and the database queries for creating and
//! authenticating accounts.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer account IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountId(i64);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the account ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The longest username, in characters, that an account may have.
const MAX_USERNAME_LENGTH: usize = 64;

/// The name a user logs in with.
///
/// Usernames have surrounding whitespace removed, must not be empty and must
/// not contain control characters. Usernames are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create and validate a username.
    ///
    /// # Errors
    /// Returns an [Error::InvalidUsername] if the trimmed name is empty, longer
    /// than 64 characters or contains control characters.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        if username.is_empty() {
            return Err(Error::InvalidUsername("username cannot be empty".to_owned()));
        }

        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(Error::InvalidUsername(format!(
                "username cannot be longer than {MAX_USERNAME_LENGTH} characters"
            )));
        }

        if username.chars().any(char::is_control) {
            return Err(Error::InvalidUsername(
                "username cannot contain control characters".to_owned(),
            ));
        }

        Ok(Self(username.to_owned()))
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure that `raw_username` is a valid username.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account's ID in the application database.
    pub id: AccountId,
    /// The unique name the user logs in with.
    pub username: Username,
    /// The salted and hashed password.
    pub password_hash: PasswordHash,
    /// The user's monthly salary.
    pub monthly_salary: f64,
}

/// A valid bcrypt hash that is verified against when a username does not
/// exist, so that failed log-ins take the same time either way.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm";

/// Create the table for storing accounts.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                salary REAL NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new account into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::NegativeAmount] if `monthly_salary` is negative or not a finite number,
/// - [Error::DuplicateUsername] if another account already uses `username`,
/// - or [Error::SqlError] if some other SQL error occurred.
pub fn create_account(
    username: Username,
    password_hash: PasswordHash,
    monthly_salary: f64,
    connection: &Connection,
) -> Result<Account, Error> {
    if !monthly_salary.is_finite() || monthly_salary < 0.0 {
        return Err(Error::NegativeAmount("salary"));
    }

    connection
        .execute(
            "INSERT INTO users (username, password, salary) VALUES (?1, ?2, ?3)",
            (username.as_str(), password_hash.as_ref(), monthly_salary),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_string()),
            error => error.into(),
        })?;

    let id = AccountId::new(connection.last_insert_rowid());

    Ok(Account {
        id,
        username,
        password_hash,
        monthly_salary,
    })
}

/// Get the account from the database with an ID equal to `account_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `account_id` does not belong to a registered account,
/// - there was an error trying to access the database.
pub fn get_account(account_id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, username, password, salary FROM users WHERE id = :id")?
        .query_row(&[(":id", &account_id.as_i64())], map_account_row)
        .map_err(|error| error.into())
}

/// Get the account from the database whose username is exactly `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - no account has the name `username`,
/// - there was an error trying to access the database.
pub fn get_account_by_username(username: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, username, password, salary FROM users WHERE username = :username")?
        .query_row(&[(":username", &username)], map_account_row)
        .map_err(|error| error.into())
}

/// Check a claimed username and password against the stored accounts.
///
/// Returns the matching account, or `None` if the username is unknown or the
/// password is wrong. The username must match exactly (case-sensitive).
///
/// This is [find_account_for_log_in] followed by [verify_log_in]. Callers
/// sharing a connection behind a lock should call the two separately and
/// release the lock in between, since the bcrypt check is slow.
///
/// # Errors
///
/// Returns a [Error::HashingError] if the stored hash could not be checked, or
/// a [Error::SqlError] if there was an error trying to access the database.
pub fn authenticate(
    username: &str,
    raw_password: &str,
    connection: &Connection,
) -> Result<Option<Account>, Error> {
    let account = find_account_for_log_in(username, connection)?;

    verify_log_in(account, raw_password)
}

/// Look up the account a log-in attempt names, `None` if there is no such account.
///
/// # Errors
///
/// Returns a [Error::SqlError] if there was an error trying to access the database.
pub fn find_account_for_log_in(
    username: &str,
    connection: &Connection,
) -> Result<Option<Account>, Error> {
    match get_account_by_username(username.trim(), connection) {
        Ok(account) => Ok(Some(account)),
        Err(Error::NotFound) => Ok(None),
        Err(error) => Err(error),
    }
}

/// Check `raw_password` against the account found by [find_account_for_log_in].
///
/// An unknown account still costs one bcrypt check, so response times do not
/// reveal which usernames exist.
///
/// # Errors
///
/// Returns a [Error::HashingError] if the stored hash could not be checked.
pub fn verify_log_in(
    account: Option<Account>,
    raw_password: &str,
) -> Result<Option<Account>, Error> {
    let Some(account) = account else {
        // The result is discarded, only the time spent matters.
        let _ = PasswordHash::new_unchecked(DUMMY_PASSWORD_HASH).verify(raw_password);
        return Ok(None);
    };

    let is_password_valid = account
        .password_hash
        .verify(raw_password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    Ok(is_password_valid.then_some(account))
}

/// Get the number of accounts in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_accounts(connection: &Connection) -> Result<usize, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM users;", [], |row| row.get(0))?;

    usize::try_from(count)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, count).into())
}

/// Replace the password hash of the account with `account_id`.
///
/// # Errors
///
/// Returns a [Error::NotFound] if no account has the ID `account_id`, or a
/// [Error::SqlError] if an SQL related error occurred.
pub fn update_password(
    account_id: AccountId,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE users SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), account_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = AccountId::new(row.get(0)?);
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;
    let monthly_salary = row.get(3)?;

    Ok(Account {
        id,
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        monthly_salary,
    })
}


#[cfg(test)]
mod account_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        account::{
            AccountId, Username, authenticate, count_accounts, create_account,
            find_account_for_log_in, get_account, get_account_by_username, update_password,
            verify_log_in,
        },
        db::initialize,
    };

    const PASSWORD: &str = "correcthorsebatterystaple";

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        conn
    }

    fn hash(password: &str) -> PasswordHash {
        PasswordHash::from_raw_password(password, "someone", 4).expect("Could not hash password")
    }

    #[test]
    fn create_account_succeeds() {
        let conn = get_db_connection();

        let account =
            create_account(Username::new_unchecked("priya"), hash(PASSWORD), 50_000.0, &conn)
                .unwrap();

        assert!(account.id.as_i64() > 0);
        assert_eq!(account.username.as_str(), "priya");
        assert_eq!(account.monthly_salary, 50_000.0);
    }

    #[test]
    fn create_account_fails_on_duplicate_username() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 50_000.0, &conn)
            .unwrap();

        let result = create_account(
            Username::new_unchecked("priya"),
            hash("anotherverylongpassphrase"),
            10.0,
            &conn,
        );

        assert_eq!(result, Err(Error::DuplicateUsername("priya".to_owned())));
        assert_eq!(count_accounts(&conn).unwrap(), 1);
    }

    #[test]
    fn usernames_differing_in_case_are_distinct() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let result = create_account(Username::new_unchecked("Priya"), hash(PASSWORD), 2.0, &conn);

        assert!(result.is_ok());
    }

    #[test]
    fn create_account_fails_on_negative_salary() {
        let conn = get_db_connection();

        let result = create_account(Username::new_unchecked("priya"), hash(PASSWORD), -1.0, &conn);

        assert_eq!(result, Err(Error::NegativeAmount("salary")));
        assert_eq!(count_accounts(&conn).unwrap(), 0);
    }

    #[test]
    fn create_account_fails_on_nan_salary() {
        let conn = get_db_connection();

        let result = create_account(
            Username::new_unchecked("priya"),
            hash(PASSWORD),
            f64::NAN,
            &conn,
        );

        assert_eq!(result, Err(Error::NegativeAmount("salary")));
    }

    #[test]
    fn create_then_authenticate_returns_account_with_salary() {
        let conn = get_db_connection();
        let created =
            create_account(Username::new_unchecked("priya"), hash(PASSWORD), 42_500.5, &conn)
                .unwrap();

        let authenticated = authenticate("priya", PASSWORD, &conn).unwrap();

        assert_eq!(authenticated, Some(created));
        assert_eq!(authenticated.unwrap().monthly_salary, 42_500.5);
    }

    #[test]
    fn authenticate_fails_with_wrong_password() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let authenticated = authenticate("priya", "notthepasswordatall", &conn).unwrap();

        assert_eq!(authenticated, None);
    }

    #[test]
    fn authenticate_fails_with_unknown_username() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let authenticated = authenticate("arjun", PASSWORD, &conn).unwrap();

        assert_eq!(authenticated, None);
    }

    #[test]
    fn authenticate_is_case_sensitive() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let authenticated = authenticate("PRIYA", PASSWORD, &conn).unwrap();

        assert_eq!(authenticated, None);
    }

    #[test]
    fn log_in_lookup_then_verify_without_connection() {
        let conn = get_db_connection();
        let created =
            create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let found = find_account_for_log_in(" priya ", &conn).unwrap();
        drop(conn);

        assert_eq!(found, Some(created.clone()));
        assert_eq!(verify_log_in(found.clone(), PASSWORD).unwrap(), Some(created));
        assert_eq!(verify_log_in(found, "notthepasswordatall").unwrap(), None);
    }

    #[test]
    fn log_in_lookup_of_unknown_username_verifies_to_none() {
        let conn = get_db_connection();

        let found = find_account_for_log_in("arjun", &conn).unwrap();

        assert_eq!(found, None);
        assert_eq!(verify_log_in(found, PASSWORD).unwrap(), None);
    }

    #[test]
    fn password_is_not_stored_in_plain_text() {
        let conn = get_db_connection();
        create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let stored: String = conn
            .query_row(
                "SELECT password FROM users WHERE username = 'priya'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_ne!(stored, PASSWORD);
        assert!(!stored.contains(PASSWORD));
    }

    #[test]
    fn get_account_fails_with_non_existent_id() {
        let conn = get_db_connection();

        assert_eq!(get_account(AccountId::new(42), &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_account_by_username_succeeds() {
        let conn = get_db_connection();
        let created =
            create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();

        let retrieved = get_account_by_username("priya", &conn).unwrap();

        assert_eq!(retrieved, created);
    }

    #[test]
    fn update_password_replaces_hash() {
        let conn = get_db_connection();
        let account =
            create_account(Username::new_unchecked("priya"), hash(PASSWORD), 1.0, &conn).unwrap();
        let new_password = "aneverlongerandbetterpassphrase";

        update_password(account.id, &hash(new_password), &conn).unwrap();

        assert_eq!(authenticate("priya", PASSWORD, &conn).unwrap(), None);
        assert!(authenticate("priya", new_password, &conn).unwrap().is_some());
    }

    #[test]
    fn update_password_fails_for_missing_account() {
        let conn = get_db_connection();

        let result = update_password(AccountId::new(7), &hash(PASSWORD), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
