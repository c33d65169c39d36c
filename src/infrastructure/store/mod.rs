//! Key-value store client, the service's single source of truth.
//!
//! Provides a [`KvStore`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store
//! - [`MemoryStore`] - In-process store for tests and local development
//!
//! Which one is used is decided by configuration (`STORE_BACKEND`); a failed Redis
//! connection is a startup error, never a silent switch to memory.

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{KvCommand, KvError, KvResult, KvStore};

#[cfg(test)]
pub use service::MockKvStore;
