mod common;

use axum::http::{HeaderValue, header};
use serde_json::json;

#[tokio::test]
async fn test_register_and_login() {
    let server = common::make_server();

    let response = server
        .post("/auth/register")
        .json(&json!({ "username": "alice", "password": "secret123" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "ok": true }));

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "secret123" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["access_token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = common::make_server();
    common::register_and_login(&server, "alice").await;

    let response = server
        .post("/auth/register")
        .json(&json!({ "username": "alice", "password": "another-password" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");

    // Original password still works
    server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "secret123" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_register_invalid_input() {
    let server = common::make_server();

    for body in [
        json!({ "username": "al", "password": "secret123" }),
        json!({ "username": "bad name", "password": "secret123" }),
        json!({ "username": "alice", "password": "123" }),
    ] {
        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["error"]["details"]["fields"].is_array());
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = common::make_server();
    common::register_and_login(&server, "alice").await;

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;

    response.assert_status_unauthorized();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let server = common::make_server();

    let response = server
        .post("/auth/login")
        .json(&json!({ "username": "ghost", "password": "secret123" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let server = common::make_server();
    let foreign = kv_shortener::application::services::TokenService::new("other-secret", 60)
        .issue_access_token("alice")
        .unwrap();

    let (name, value) = common::bearer(&foreign);
    let response = server
        .post("/shorten")
        .add_header(name, value)
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.header(header::WWW_AUTHENTICATE),
        HeaderValue::from_static("Bearer")
    );
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let server = common::make_server();
    let expired = kv_shortener::application::services::TokenService::new(common::TEST_SECRET, 60)
        .issue_token("alice", -5)
        .unwrap();

    let (name, value) = common::bearer(&expired);
    let response = server.get("/top").add_header(name, value).await;

    response.assert_status_unauthorized();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["message"], "Token expired");
}
