//! API route configuration.
//!
//! Route groups are returned unlayered; [`crate::routes::app_router`] decides which
//! of them sit behind [`crate::api::middleware::auth`] and the rate limiter.

use crate::api::handlers::{
    login_handler, register_handler, shorten_handler, stats_handler, top_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Account endpoints. Public, rate limited.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Exchange credentials for a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// Link creation. Always requires a bearer token.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Analytics endpoints. Bearer token required when analytics are protected.
///
/// # Endpoints
///
/// - `GET /stats/{code}` - Statistics for one link
/// - `GET /top`          - Most clicked links
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/{code}", get(stats_handler))
        .route("/top", get(top_handler))
}
