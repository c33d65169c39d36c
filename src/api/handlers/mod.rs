//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;
pub mod top;

pub use auth::{login_handler, register_handler};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;
pub use top::top_handler;
