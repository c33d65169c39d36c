mod common;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use kv_shortener::infrastructure::store::MemoryStore;
use kv_shortener::routes::{RouteOptions, app_router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

fn limited_app() -> Router {
    app_router(
        common::create_test_state(Arc::new(MemoryStore::new())),
        RouteOptions {
            protect_analytics: true,
            rate_limit: true,
        },
    )
}

/// A JSON POST as it arrives from a connection at `peer`.
fn post_from(peer: [u8; 4], uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(SocketAddr::from((peer, 4000))))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn status_of(app: &Router, request: Request<Body>) -> StatusCode {
    app.clone().oneshot(request).await.unwrap().status()
}

const LOGIN_BODY: &str = r#"{"username":"alice","password":"wrong-password"}"#;

#[tokio::test]
async fn test_login_burst_is_limited_per_ip() {
    let app = limited_app();

    for attempt in 1..=10 {
        let status = status_of(&app, post_from([127, 0, 0, 1], "/auth/login", LOGIN_BODY)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "attempt {}", attempt);
    }

    let status = status_of(&app, post_from([127, 0, 0, 1], "/auth/login", LOGIN_BODY)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Another client still has its full burst.
    let status = status_of(&app, post_from([10, 0, 0, 2], "/auth/login", LOGIN_BODY)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shorten_is_not_rate_limited() {
    let app = limited_app();

    for _ in 0..11 {
        status_of(&app, post_from([127, 0, 0, 1], "/auth/login", LOGIN_BODY)).await;
    }

    for attempt in 1..=20 {
        let status = status_of(
            &app,
            post_from([127, 0, 0, 1], "/shorten", r#"{"url":"https://example.com"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "attempt {}", attempt);
    }
}
