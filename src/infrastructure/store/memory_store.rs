//! In-process key-value store for tests and single-node development runs.

use super::service::{KvCommand, KvError, KvResult, KvStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
    SortedSet(HashMap<String, f64>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Hash(_) => "hash",
            Value::SortedSet(_) => "zset",
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A [`KvStore`] kept in process memory.
///
/// Mirrors the Redis command semantics the service relies on (shared keyspace,
/// lazy expiry, `-1`/`-2` TTL sentinels, NX writes). All keys live behind a single
/// mutex, so every trait call is atomic with respect to the others.
///
/// Time is read from `tokio::time`, which lets tests drive expiry with a paused clock.
///
/// # Use Cases
///
/// - Handler and service tests without a Redis server
/// - Local development with `STORE_BACKEND=memory`
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }
}

/// Returns the live entry for `key`, dropping it first if it has expired.
fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    let now = Instant::now();
    if entries.get(key).is_some_and(|e| e.is_expired(now)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn wrong_type(key: &str, expected: &str, found: &Value) -> KvError {
    KvError::WrongType(format!(
        "key '{}' holds a {}, expected {}",
        key,
        found.kind(),
        expected
    ))
}

fn hash_mut<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
) -> KvResult<&'a mut HashMap<String, String>> {
    if live(entries, key).is_none() {
        entries.insert(key.to_string(), Entry::new(Value::Hash(HashMap::new())));
    }
    match entries.get_mut(key).map(|e| &mut e.value) {
        Some(Value::Hash(fields)) => Ok(fields),
        Some(other) => Err(wrong_type(key, "hash", other)),
        None => Err(KvError::Command(format!("key '{}' vanished", key))),
    }
}

fn deadline(seconds: u64) -> KvResult<Instant> {
    Instant::now()
        .checked_add(Duration::from_secs(seconds))
        .ok_or_else(|| KvError::InvalidValue(format!("expire time {}s out of range", seconds)))
}

fn apply(entries: &mut HashMap<String, Entry>, command: KvCommand) -> KvResult<()> {
    match command {
        KvCommand::Set { key, value } => {
            entries.insert(key, Entry::new(Value::Str(value)));
        }
        KvCommand::HashSet { key, fields } => {
            hash_mut(entries, &key)?.extend(fields);
        }
        KvCommand::Expire { key, seconds } => {
            let at = deadline(seconds)?;
            if let Some(entry) = live(entries, &key) {
                entry.expires_at = Some(at);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key).map(|e| &e.value) {
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, "string", other)),
            None => Ok(None),
        }
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> KvResult<bool> {
        let mut entries = self.entries.lock();
        if live(&mut entries, key).is_some() {
            return Ok(false);
        }

        let expires_at = ttl_seconds.map(deadline).transpose()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn exists(&self, key: &str) -> KvResult<bool> {
        let mut entries = self.entries.lock();
        Ok(live(&mut entries, key).is_some())
    }

    async fn incr(&self, key: &str) -> KvResult<i64> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key) {
            Some(entry) => {
                let Value::Str(current) = &entry.value else {
                    return Err(wrong_type(key, "string", &entry.value));
                };
                let next = current
                    .parse::<i64>()
                    .map_err(|_| {
                        KvError::InvalidValue(format!("value at '{}' is not an integer", key))
                    })?
                    .checked_add(1)
                    .ok_or_else(|| {
                        KvError::InvalidValue(format!("increment overflow at '{}'", key))
                    })?;
                entry.value = Value::Str(next.to_string());
                Ok(next)
            }
            None => {
                entries.insert(key.to_string(), Entry::new(Value::Str("1".to_string())));
                Ok(1)
            }
        }
    }

    async fn ttl(&self, key: &str) -> KvResult<i64> {
        let mut entries = self.entries.lock();
        let Some(entry) = live(&mut entries, key) else {
            return Ok(-2);
        };
        match entry.expires_at {
            None => Ok(-1),
            Some(at) => {
                let remaining = at.saturating_duration_since(Instant::now());
                // Redis rounds the millisecond TTL to the nearest second.
                Ok(((remaining.as_millis() + 500) / 1000) as i64)
            }
        }
    }

    async fn hget(&self, key: &str, field: &str) -> KvResult<Option<String>> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key).map(|e| &e.value) {
            Some(Value::Hash(fields)) => Ok(fields.get(field).cloned()),
            Some(other) => Err(wrong_type(key, "hash", other)),
            None => Ok(None),
        }
    }

    async fn hget_all(&self, key: &str) -> KvResult<HashMap<String, String>> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key).map(|e| &e.value) {
            Some(Value::Hash(fields)) => Ok(fields.clone()),
            Some(other) => Err(wrong_type(key, "hash", other)),
            None => Ok(HashMap::new()),
        }
    }

    async fn hset_if_absent(&self, key: &str, field: &str, value: &str) -> KvResult<bool> {
        let mut entries = self.entries.lock();
        let fields = hash_mut(&mut entries, key)?;
        if fields.contains_key(field) {
            return Ok(false);
        }
        fields.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> KvResult<()> {
        let mut entries = self.entries.lock();
        if live(&mut entries, key).is_none() {
            entries.insert(
                key.to_string(),
                Entry::new(Value::SortedSet(HashMap::new())),
            );
        }
        match entries.get_mut(key).map(|e| &mut e.value) {
            Some(Value::SortedSet(members)) => {
                members.insert(member.to_string(), score);
                Ok(())
            }
            Some(other) => Err(wrong_type(key, "zset", other)),
            None => Err(KvError::Command(format!("key '{}' vanished", key))),
        }
    }

    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> KvResult<Vec<(String, f64)>> {
        let mut entries = self.entries.lock();
        let members = match live(&mut entries, key).map(|e| &e.value) {
            Some(Value::SortedSet(members)) => members,
            Some(other) => return Err(wrong_type(key, "zset", other)),
            None => return Ok(Vec::new()),
        };

        // Descending score; equal scores in reverse lexicographic order, like ZREVRANGE.
        let mut ranked: Vec<(String, f64)> =
            members.iter().map(|(m, s)| (m.clone(), *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let len = ranked.len() as isize;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(ranked
            .into_iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .collect())
    }

    async fn execute(&self, commands: Vec<KvCommand>) -> KvResult<()> {
        let mut entries = self.entries.lock();
        for command in commands {
            apply(&mut entries, command)?;
        }
        Ok(())
    }

    async fn ping(&self) -> KvResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_if_absent_does_not_overwrite() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("url:a", "first", None).await.unwrap());
        assert!(!store.set_if_absent("url:a", "second", None).await.unwrap());
        assert_eq!(store.get("url:a").await.unwrap().as_deref(), Some("first"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_expires_after_ttl() {
        let store = MemoryStore::new();
        store.set_if_absent("url:a", "x", Some(30)).await.unwrap();

        assert_eq!(store.ttl("url:a").await.unwrap(), 30);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.ttl("url:a").await.unwrap(), 20);
        assert!(store.exists("url:a").await.unwrap());

        tokio::time::advance(Duration::from_secs(21)).await;
        assert!(!store.exists("url:a").await.unwrap());
        assert_eq!(store.get("url:a").await.unwrap(), None);
        assert_eq!(store.ttl("url:a").await.unwrap(), -2);

        // An expired key can be claimed again.
        assert!(store.set_if_absent("url:a", "y", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_rejected() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.set_if_absent("url:a", "x", Some(u64::MAX)).await,
            Err(KvError::InvalidValue(_))
        ));
        assert!(!store.exists("url:a").await.unwrap());

        store.set_if_absent("meta:a", "x", None).await.unwrap();
        assert!(matches!(
            store
                .execute(vec![KvCommand::Expire {
                    key: "meta:a".into(),
                    seconds: u64::MAX,
                }])
                .await,
            Err(KvError::InvalidValue(_))
        ));
        assert_eq!(store.ttl("meta:a").await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_ttl_without_expiry() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "v", None).await.unwrap();

        assert_eq!(store.ttl("k").await.unwrap(), -1);
        assert_eq!(store.ttl("missing").await.unwrap(), -2);
    }

    #[tokio::test]
    async fn test_incr_creates_and_increments() {
        let store = MemoryStore::new();

        assert_eq!(store.incr("clicks:a").await.unwrap(), 1);
        assert_eq!(store.incr("clicks:a").await.unwrap(), 2);

        store
            .execute(vec![KvCommand::Set {
                key: "clicks:b".into(),
                value: "41".into(),
            }])
            .await
            .unwrap();
        assert_eq!(store.incr("clicks:b").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_incr_rejects_non_integer() {
        let store = MemoryStore::new();
        store.set_if_absent("k", "abc", None).await.unwrap();

        assert!(matches!(
            store.incr("k").await,
            Err(KvError::InvalidValue(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_type_is_reported() {
        let store = MemoryStore::new();
        store.zadd("links:popular", "a", 1.0).await.unwrap();

        assert!(matches!(
            store.get("links:popular").await,
            Err(KvError::WrongType(_))
        ));
    }

    #[tokio::test]
    async fn test_hash_fields() {
        let store = MemoryStore::new();

        assert!(store.hset_if_absent("user:a", "password_hash", "h1").await.unwrap());
        assert!(!store.hset_if_absent("user:a", "password_hash", "h2").await.unwrap());
        assert_eq!(
            store.hget("user:a", "password_hash").await.unwrap().as_deref(),
            Some("h1")
        );

        store
            .execute(vec![KvCommand::HashSet {
                key: "meta:a".into(),
                fields: vec![
                    ("created_at".into(), "100".into()),
                    ("ttl_sec".into(), "0".into()),
                ],
            }])
            .await
            .unwrap();

        let meta = store.hget_all("meta:a").await.unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["created_at"], "100");
        assert!(store.hget_all("meta:missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zrevrange_orders_by_score() {
        let store = MemoryStore::new();
        store.zadd("z", "low", 1.0).await.unwrap();
        store.zadd("z", "high", 10.0).await.unwrap();
        store.zadd("z", "mid", 5.0).await.unwrap();
        store.zadd("z", "low", 7.0).await.unwrap();

        let all = store.zrevrange_with_scores("z", 0, -1).await.unwrap();
        let codes: Vec<&str> = all.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(codes, vec!["high", "low", "mid"]);

        let top_two = store.zrevrange_with_scores("z", 0, 1).await.unwrap();
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[1], ("low".to_string(), 7.0));

        assert!(store.zrevrange_with_scores("z", 5, 9).await.unwrap().is_empty());
        assert!(
            store
                .zrevrange_with_scores("missing", 0, 9)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_applies_expiry() {
        let store = MemoryStore::new();
        store
            .execute(vec![
                KvCommand::HashSet {
                    key: "meta:a".into(),
                    fields: vec![("ttl_sec".into(), "5".into())],
                },
                KvCommand::Set {
                    key: "clicks:a".into(),
                    value: "0".into(),
                },
                KvCommand::Expire {
                    key: "meta:a".into(),
                    seconds: 5,
                },
                KvCommand::Expire {
                    key: "clicks:a".into(),
                    seconds: 5,
                },
            ])
            .await
            .unwrap();

        assert!(store.exists("meta:a").await.unwrap());
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(!store.exists("meta:a").await.unwrap());
        assert!(!store.exists("clicks:a").await.unwrap());
    }
}
