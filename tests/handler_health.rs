mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use kv_shortener::infrastructure::store::{KvCommand, KvError, KvResult, KvStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Store whose every call fails, as if Redis were unreachable.
struct DownStore;

fn down<T>() -> KvResult<T> {
    Err(KvError::Connection("connection refused".to_string()))
}

#[async_trait]
impl KvStore for DownStore {
    async fn get(&self, _key: &str) -> KvResult<Option<String>> {
        down()
    }
    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Option<u64>) -> KvResult<bool> {
        down()
    }
    async fn exists(&self, _key: &str) -> KvResult<bool> {
        down()
    }
    async fn incr(&self, _key: &str) -> KvResult<i64> {
        down()
    }
    async fn ttl(&self, _key: &str) -> KvResult<i64> {
        down()
    }
    async fn hget(&self, _key: &str, _field: &str) -> KvResult<Option<String>> {
        down()
    }
    async fn hget_all(&self, _key: &str) -> KvResult<HashMap<String, String>> {
        down()
    }
    async fn hset_if_absent(&self, _key: &str, _field: &str, _value: &str) -> KvResult<bool> {
        down()
    }
    async fn zadd(&self, _key: &str, _member: &str, _score: f64) -> KvResult<()> {
        down()
    }
    async fn zrevrange_with_scores(
        &self,
        _key: &str,
        _start: isize,
        _stop: isize,
    ) -> KvResult<Vec<(String, f64)>> {
        down()
    }
    async fn execute(&self, _commands: Vec<KvCommand>) -> KvResult<()> {
        down()
    }
    async fn ping(&self) -> KvResult<()> {
        down()
    }
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = common::make_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_store_down() {
    let server = common::make_server_with(Arc::new(DownStore), true);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let server = common::make_server_with(Arc::new(DownStore), false);

    let response = server.get("/stats/abc1234").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "internal_error");
}
