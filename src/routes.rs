//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`         - Short link redirect (public)
//! - `GET  /health`         - Store health check (public)
//! - `POST /auth/*`         - Registration and login (public, rate limited)
//! - `POST /shorten`        - Link creation (Bearer token required)
//! - `GET  /stats/{code}`, `GET /top` - Analytics (Bearer token optional, see [`RouteOptions`])
//!
//! Static routes take precedence over `/{code}`, so a code can never shadow them.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the auth routes
//! - **Authentication** - Bearer token

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};

/// Switches that change which middleware wraps which routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptions {
    /// Require a bearer token on `/stats/{code}` and `/top`.
    pub protect_analytics: bool,
    /// Apply the per-IP limiter to `/auth/*`. Needs a `ConnectInfo<SocketAddr>`
    /// connection on every request.
    pub rate_limit: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            protect_analytics: true,
            rate_limit: true,
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `options` - analytics protection and rate limiting switches
pub fn app_router(state: AppState, options: RouteOptions) -> Router {
    let mut auth_router = api::routes::auth_routes();
    if options.rate_limit {
        auth_router = auth_router.layer(rate_limit::secure_layer());
    }

    let protected_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let mut analytics_router = api::routes::analytics_routes();
    if options.protect_analytics {
        analytics_router = analytics_router
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    }

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(auth_router)
        .merge(protected_router)
        .merge(analytics_router)
        .with_state(state)
        .layer(tracing::layer())
}
