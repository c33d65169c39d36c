//! Application layer services implementing business logic.
//!
//! Services sit between the HTTP handlers and the key-value store. They own
//! validation and business rules; handlers only translate requests and responses.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, redirects and rankings
//! - [`services::account_service::AccountService`] - User registration and credential checks
//! - [`services::token_service::TokenService`] - Bearer token issuing and validation

pub mod services;
