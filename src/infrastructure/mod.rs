//! Infrastructure layer for external integrations.
//!
//! This layer implements the storage interface consumed by the application
//! services.
//!
//! # Modules
//!
//! - [`store`] - Key-value store abstraction (Redis and in-memory implementations)

pub mod store;
