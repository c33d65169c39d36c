//! Redis-backed key-value store.

use super::service::{KvCommand, KvError, KvResult, KvStore};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::collections::HashMap;
use tracing::{debug, info};

/// Key-value store backed by a Redis server.
///
/// Uses `ConnectionManager` for a shared multiplexed connection with automatic
/// reconnects; cloning the manager is cheap and every call works on its own clone.
/// Unlike a cache, errors are propagated: Redis is the source of truth.
#[derive(Clone)]
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> KvResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| KvError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| KvError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let store = Self { client: manager };
        store.ping().await?;

        info!("Connected to Redis");

        Ok(store)
    }
}

fn command_error(e: redis::RedisError) -> KvError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        return KvError::Connection(e.to_string());
    }
    KvError::Command(e.to_string())
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.get(key).await.map_err(command_error)?;
        debug!(key, hit = value.is_some(), "GET");
        Ok(value)
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> KvResult<bool> {
        let mut conn = self.client.clone();

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }

        // SET ... NX replies OK when written and nil otherwise.
        let reply: Option<String> = cmd.query_async(&mut conn).await.map_err(command_error)?;
        Ok(reply.is_some())
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        let mut conn = self.client.clone();
        let exists: bool = conn.exists(key).await.map_err(command_error)?;
        Ok(exists)
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        let mut conn = self.client.clone();
        let value: i64 = conn.incr(key, 1).await.map_err(command_error)?;
        Ok(value)
    }

    async fn ttl(&self, key: &str) -> KvResult<i64> {
        let mut conn = self.client.clone();
        let ttl: i64 = conn.ttl(key).await.map_err(command_error)?;
        Ok(ttl)
    }

    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>> {
        let mut conn = self.client.clone();
        let value: Option<String> = conn.hget(key, field).await.map_err(command_error)?;
        Ok(value)
    }

    async fn hget_all(&self, key: &str) -> KvResult<HashMap<String, String>> {
        let mut conn = self.client.clone();
        let fields: HashMap<String, String> = conn.hgetall(key).await.map_err(command_error)?;
        Ok(fields)
    }

    async fn hset_if_absent(&self, key: &str, field: &str, value: &str) -> KvResult<bool> {
        let mut conn = self.client.clone();
        let written: bool = conn
            .hset_nx(key, field, value)
            .await
            .map_err(command_error)?;
        Ok(written)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()> {
        let mut conn = self.client.clone();
        let _: i64 = conn.zadd(key, member, score).await.map_err(command_error)?;
        Ok(())
    }

    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> KvResult<Vec<(String, f64)>> {
        let mut conn = self.client.clone();
        let entries: Vec<(String, f64)> = conn
            .zrevrange_withscores(key, start, stop)
            .await
            .map_err(command_error)?;
        Ok(entries)
    }

    async fn execute(&self, commands: Vec<KvCommand>) -> KvResult<()> {
        if commands.is_empty() {
            return Ok(());
        }

        // Plain pipeline, not MULTI/EXEC: a failure can leave part of the batch applied.
        let mut pipe = redis::pipe();
        for command in &commands {
            match command {
                KvCommand::Set { key, value } => {
                    pipe.set(key, value).ignore();
                }
                KvCommand::HashSet { key, fields } => {
                    pipe.hset_multiple(key, fields.as_slice()).ignore();
                }
                KvCommand::Expire { key, seconds } => {
                    pipe.expire(key, *seconds as i64).ignore();
                }
            }
        }

        let mut conn = self.client.clone();
        let _: () = pipe.query_async(&mut conn).await.map_err(command_error)?;
        debug!(commands = commands.len(), "Pipeline executed");

        Ok(())
    }

    async fn ping(&self) -> KvResult<()> {
        let mut conn = self.client.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;
        Ok(())
    }
}
