//! Utility functions for code generation, password hashing and URL checks.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`password`] - Argon2id password hashing
//! - [`url_validator`] - Redirect target validation
//! - [`username`] - Account name rules

pub mod code_generator;
pub mod password;
pub mod url_validator;
pub mod username;
