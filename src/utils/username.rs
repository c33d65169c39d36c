//! Account name rules shared by registration and the admin tool.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;

/// Usernames: letters, digits, `_`, `.` and `-`.
pub static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid username regex"));

/// Validates an account name.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for names outside 3-32 characters or with
/// characters other than letters, digits, `_`, `.` and `-`.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::bad_request(
            format!(
                "Username must be {}-{} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            ),
            json!({ "provided_length": len }),
        ));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(AppError::bad_request(
            "Username may only contain letters, digits, '_', '.' and '-'",
            json!({ "username": username }),
        ));
    }

    Ok(())
}
