#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use kv_shortener::application::services::TokenService;
use kv_shortener::infrastructure::store::{KvStore, MemoryStore};
use kv_shortener::routes::{RouteOptions, app_router};
use kv_shortener::state::AppState;
use serde_json::json;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_state(store: Arc<dyn KvStore>) -> AppState {
    AppState::new(store, TokenService::new(TEST_SECRET, 60), BASE_URL, 7)
}

/// Full router on a fresh in-memory store, analytics protected.
pub fn make_server() -> TestServer {
    make_server_with(Arc::new(MemoryStore::new()), true)
}

pub fn make_server_with(store: Arc<dyn KvStore>, protect_analytics: bool) -> TestServer {
    let app = app_router(
        create_test_state(store),
        RouteOptions {
            protect_analytics,
            rate_limit: false,
        },
    );

    TestServer::new(app).unwrap()
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

/// Registers `username` and returns a fresh access token.
pub async fn register_and_login(server: &TestServer, username: &str) -> String {
    server
        .post("/auth/register")
        .json(&json!({ "username": username, "password": "secret123" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": username, "password": "secret123" }))
        .await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Creates a link through the API and returns its code.
pub async fn shorten(server: &TestServer, token: &str, body: serde_json::Value) -> String {
    let (name, value) = bearer(token);
    let response = server.post("/shorten").add_header(name, value).json(&body).await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["code"]
        .as_str()
        .unwrap()
        .to_string()
}
