//! Key-value store trait, batched commands and error types.

use async_trait::async_trait;
use std::collections::HashMap;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store command error: {0}")]
    Command(String),

    #[error("Operation against a key holding the wrong kind of value: {0}")]
    WrongType(String),

    #[error("Stored value is not valid: {0}")]
    InvalidValue(String),
}

/// Result type for store operations.
pub type KvResult<T> = Result<T, KvError>;

/// A write submitted as part of a [`KvStore::execute`] batch.
///
/// Batches are sent as one unit (a Redis pipeline) but are *not* atomic across keys.
#[derive(Debug, Clone, PartialEq)]
pub enum KvCommand {
    /// `SET key value`
    Set { key: String, value: String },
    /// `HSET key f1 v1 f2 v2 ...`
    HashSet {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// `EXPIRE key seconds`
    Expire { key: String, seconds: u64 },
}

/// Command surface of the key-value store used as the service's only data store.
///
/// Semantics follow Redis: keys share a single namespace, expired keys behave as
/// absent, and `ttl` reports `-2` for a missing key and `-1` for a key without expiry.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - network-backed Redis client
/// - [`crate::infrastructure::store::MemoryStore`] - in-process stand-in for tests and local runs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the string stored at `key`.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Atomically stores `value` at `key` only if the key does not exist,
    /// optionally with an expiry. Returns `true` if the value was written.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> KvResult<bool>;

    /// Returns whether `key` exists (and has not expired).
    async fn exists(&self, key: &str) -> KvResult<bool>;

    /// Atomically increments the integer at `key` by one, creating it at `0` first
    /// if missing. Returns the new value.
    async fn incr(&self, key: &str) -> KvResult<i64>;

    /// Remaining time to live of `key` in seconds (`-1` no expiry, `-2` missing).
    async fn ttl(&self, key: &str) -> KvResult<i64>;

    /// Returns a single hash field.
    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>>;

    /// Returns all fields of the hash at `key` (empty if missing).
    async fn hget_all(&self, key: &str) -> KvResult<HashMap<String, String>>;

    /// Atomically sets a hash field only if it does not exist yet.
    async fn hset_if_absent(&self, key: &str, field: &str, value: &str) -> KvResult<bool>;

    /// Sets the score of `member` in the sorted set at `key`.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()>;

    /// Returns members ranked `start..=stop` by descending score, with scores.
    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> KvResult<Vec<(String, f64)>>;

    /// Submits a batch of writes as a single unit.
    async fn execute(&self, commands: Vec<KvCommand>) -> KvResult<()>;

    /// Checks that the store answers.
    async fn ping(&self) -> KvResult<()>;
}
