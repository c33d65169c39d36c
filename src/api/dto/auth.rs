//! DTOs for registration and login endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::username::USERNAME_REGEX;

/// Request to create a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    #[validate(regex(
        path = "*USERNAME_REGEX",
        message = "Username may only contain letters, digits, '_', '.' and '-'"
    ))]
    pub username: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
}

/// Credentials exchanged for an access token.
///
/// Only presence is checked here; wrong credentials are reported as 401, not 400.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl LoginResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register("alice", "secret123").validate().is_ok());
        assert!(register("a.b-c_d", "123456").validate().is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(register("al", "secret123").validate().is_err());
        assert!(register(&"a".repeat(33), "secret123").validate().is_err());
        assert!(register("alice smith", "secret123").validate().is_err());
        assert!(register("alice/../x", "secret123").validate().is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(register("alice", "12345").validate().is_err());
        assert!(register("alice", &"p".repeat(129)).validate().is_err());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let empty = LoginRequest {
            username: String::new(),
            password: "x".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_login_response_shape() {
        let json = serde_json::to_value(LoginResponse::bearer("tok".to_string())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "access_token": "tok", "token_type": "bearer" })
        );
    }
}
