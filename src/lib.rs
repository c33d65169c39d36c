//! # KV Shortener
//!
//! A small URL shortening service built with Axum, using Redis as its only data store.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link entities and the store key layout
//! - **Application Layer** ([`application`]) - Link, account and token services
//! - **Infrastructure Layer** ([`infrastructure`]) - Key-value store backends (Redis, in-memory)
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random or custom short codes with optional expiry
//! - Click counting and a popularity ranking
//! - Account registration with Argon2id password hashes
//! - JWT bearer authentication for link creation and analytics
//! - Rate limiting and request tracing
//!
//! ## Quick Start
//!
//! ```bash
//! export JWT_SECRET="change-me"
//! export REDIS_URL="redis://localhost:6379/0"   # or STORE_BACKEND=memory
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AccountService, LinkService, TokenService};
    pub use crate::domain::entities::{LinkStats, NewLink, TopLink};
    pub use crate::error::AppError;
    pub use crate::infrastructure::store::{KvStore, MemoryStore, RedisStore};
    pub use crate::routes::{RouteOptions, app_router};
    pub use crate::state::AppState;
}
