//! Password strength checks and salted hashing.
//!
//! Raw passwords only live long enough to be checked and hashed. The database
//! and the logs only ever see a [PasswordHash].

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is hard enough to guess, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check that `raw_password` is strong enough for the account `username`.
    ///
    /// The username is fed to the strength estimate, so a password built from
    /// it (e.g. "priya2024") scores lower.
    ///
    /// # Errors
    ///
    /// Returns an [Error::TooWeak] with advice on how to make the password
    /// stronger if it scores below three out of four.
    pub fn new(raw_password: &str, username: &str) -> Result<Self, Error> {
        let estimate = zxcvbn(raw_password, &[username]);

        match estimate.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => {
                let advice = estimate
                    .feedback()
                    .map(Feedback::to_string)
                    .filter(|advice| !advice.is_empty())
                    .unwrap_or_else(|| "add another word or two".to_owned());

                Err(Error::TooWeak(advice))
            }
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// Only for test fixtures and the demo database.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash of a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's recommended work factor.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with a fresh random salt.
    ///
    /// Tests pass a low `cost` (e.g. 4) to stay fast.
    ///
    /// # Errors
    ///
    /// Returns an [Error::HashingError] if bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check the strength of `raw_password` for `username` and then hash it.
    pub fn from_raw_password(raw_password: &str, username: &str, cost: u32) -> Result<Self, Error> {
        PasswordHash::new(ValidatedPassword::new(raw_password, username)?, cost)
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// bcrypt compares the hashes in constant time.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
