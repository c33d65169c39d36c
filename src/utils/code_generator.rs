//! Short code generation and validation utilities.
//!
//! Provides cryptographically secure random code generation and validation
//! for custom user-provided codes.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use serde_json::json;

/// Bounds on the length of a custom code.
pub const CUSTOM_CODE_MIN_LEN: usize = 3;
pub const CUSTOM_CODE_MAX_LEN: usize = 32;

/// Reserved codes that cannot be used as short links.
///
/// These are the first path segments of the service's own routes.
pub const RESERVED_CODES: &[&str] = &["auth", "shorten", "stats", "top", "health"];

/// Generates a random short code of `length` characters.
///
/// Each character is drawn uniformly from `A-Z`, `a-z`, `0-9` using the thread-local
/// RNG, a ChaCha-based CSPRNG seeded from the operating system.
/// Uniqueness is not guaranteed; callers claim the code atomically in the store.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(7);
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route name (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any validation rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN_LEN || code.len() > CUSTOM_CODE_MAX_LEN {
        return Err(AppError::bad_request(
            format!(
                "Custom code must be {}-{} characters",
                CUSTOM_CODE_MIN_LEN, CUSTOM_CODE_MAX_LEN
            ),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
