mod common;

use axum::http::StatusCode;
use kv_shortener::infrastructure::store::MemoryStore;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_stats_after_one_click() {
    let server = common::make_server();
    let token = common::register_and_login(&server, "alice").await;
    let code = common::shorten(
        &server,
        &token,
        json!({ "url": "https://example.com", "ttl_sec": 30 }),
    )
    .await;

    server
        .get(&format!("/{}", code))
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    let (name, value) = common::bearer(&token);
    let response = server
        .get(&format!("/stats/{}", code))
        .add_header(name, value)
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], code);
    assert_eq!(json["original"], "https://example.com");
    assert_eq!(json["clicks"], 1);
    assert_eq!(json["ttl_sec"], 30);
    let remaining = json["ttl_remaining"].as_i64().unwrap();
    assert!((0..=30).contains(&remaining));
    assert!(json["created_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_stats_without_expiry() {
    let server = common::make_server();
    let token = common::register_and_login(&server, "alice").await;
    let code = common::shorten(&server, &token, json!({ "url": "https://example.com" })).await;

    let (name, value) = common::bearer(&token);
    let json = server
        .get(&format!("/stats/{}", code))
        .add_header(name, value)
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["clicks"], 0);
    assert_eq!(json["ttl_remaining"], -1);
    assert_eq!(json["ttl_sec"], 0);
}

#[tokio::test]
async fn test_stats_not_found() {
    let server = common::make_server();
    let token = common::register_and_login(&server, "alice").await;

    let (name, value) = common::bearer(&token);
    let response = server.get("/stats/nonexistent").add_header(name, value).await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["message"], "Code not found or expired");
}

#[tokio::test]
async fn test_stats_requires_token_when_protected() {
    let server = common::make_server();

    server.get("/stats/anything").await.assert_status_unauthorized();
}

#[tokio::test]
async fn test_stats_public_when_unprotected() {
    let server = common::make_server_with(Arc::new(MemoryStore::new()), false);
    let token = common::register_and_login(&server, "alice").await;
    let code = common::shorten(&server, &token, json!({ "url": "https://example.com" })).await;

    server.get(&format!("/stats/{}", code)).await.assert_status_ok();
}
