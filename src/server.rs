//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring and the Axum server lifecycle.

use crate::application::services::TokenService;
use crate::config::{Config, StoreBackend};
use crate::infrastructure::store::{KvStore, MemoryStore, RedisStore};
use crate::routes::{RouteOptions, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Opens the store selected by the configuration.
///
/// A configured Redis that cannot be reached is a startup error; there is no
/// silent fallback to the in-memory store.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Store: Redis");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Store: in-memory, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Key-value store (Redis or in-memory)
/// - Link, account and token services
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - The store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;

    let token_service = TokenService::new(&config.jwt_secret, config.jwt_expires_minutes);
    let state = AppState::new(
        store,
        token_service,
        config.base_url.clone(),
        config.default_code_length,
    );

    let router = app_router(
        state,
        RouteOptions {
            protect_analytics: config.protect_analytics,
            rate_limit: config.rate_limit_enabled,
        },
    );
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
