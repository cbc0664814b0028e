//! API handlers and shared utilities.
//!
//! This module organizes the service's route handlers and provides common
//! functions for input normalization and database error classification.

pub mod health;
pub mod me;
pub mod principal;
pub mod profile;
pub mod root;
pub mod user_login;
pub mod user_register;

use regex::Regex;

/// Minimum accepted password length for registration.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Lightweight email sanity check used by the account handlers before
/// persisting data.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim an optional input and drop it entirely when blank.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
