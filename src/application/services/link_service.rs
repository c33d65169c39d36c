//! Link creation, lookup, click counting and popularity ranking.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{LinkStats, MAX_TTL_SECONDS, NewLink, TopLink};
use crate::domain::keys::{POPULAR_LINKS, clicks_key, meta_key, url_key};
use crate::error::AppError;
use crate::infrastructure::store::{KvCommand, KvStore};
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::url_validator::validate_target_url;

/// Attempts at drawing an unused random code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Service for creating and resolving short links.
///
/// All state lives in the injected [`KvStore`]; the service itself is stateless.
/// Codes are claimed with an atomic set-if-absent on `url:{code}`, so concurrent
/// requests can never end up sharing a code.
pub struct LinkService {
    store: Arc<dyn KvStore>,
    code_length: usize,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// - `store` - key-value store holding links and the popularity ranking
    /// - `code_length` - length of generated codes
    pub fn new(store: Arc<dyn KvStore>, code_length: usize) -> Self {
        Self { store, code_length }
    }

    /// Creates a short link and returns its code.
    ///
    /// # Code Selection
    ///
    /// - With `custom_code`, the code is validated and claimed as-is; if it is already
    ///   in use the call fails, it never overwrites.
    /// - Otherwise a random code is drawn; on collision a fresh one is drawn, up to
    ///   [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Storage
    ///
    /// The URL key is written by the claim itself. Metadata (`created_at`, `ttl_sec`)
    /// and a zero click counter follow in one pipelined batch; all keys receive the
    /// same expiry when a TTL is set. The batch is not atomic across keys.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an invalid URL or custom code
    /// - [`AppError::Conflict`] if the custom code is taken
    /// - [`AppError::Internal`] on store errors or when random codes keep colliding
    pub async fn create_link(&self, new_link: NewLink) -> Result<String, AppError> {
        validate_target_url(&new_link.original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let ttl = new_link.effective_ttl();
        if ttl.is_some_and(|seconds| seconds > MAX_TTL_SECONDS) {
            return Err(AppError::bad_request(
                "TTL out of range",
                json!({ "ttl_sec": ttl, "max": MAX_TTL_SECONDS }),
            ));
        }

        let code = match &new_link.custom_code {
            Some(custom) => {
                validate_custom_code(custom)?;

                if !self.claim(custom, &new_link.original_url, ttl).await? {
                    return Err(AppError::conflict(
                        "Custom code already exists",
                        json!({ "code": custom }),
                    ));
                }

                custom.clone()
            }
            None => self.claim_random_code(&new_link.original_url, ttl).await?,
        };

        self.write_link_records(&code, ttl).await?;

        info!(code = %code, ttl_sec = ttl.unwrap_or(0), "Short link created");

        Ok(code)
    }

    /// Returns the original URL for `code`, or `None` if unknown or expired.
    pub async fn fetch_url(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self.store.get(&url_key(code)).await?)
    }

    /// Records one click on `code` and returns the new count.
    ///
    /// The counter is incremented atomically; the popularity ranking is then set to
    /// the returned value, so its score always equals the latest count.
    pub async fn increment_clicks(&self, code: &str) -> Result<u64, AppError> {
        let count = self.store.incr(&clicks_key(code)).await?;
        self.store.zadd(POPULAR_LINKS, code, count as f64).await?;

        debug!(code, count, "Click recorded");

        Ok(count.max(0) as u64)
    }

    /// Assembles statistics for a live link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code was never created or has expired.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let url_key = url_key(code);

        if !self.store.exists(&url_key).await? {
            return Err(link_not_found(code));
        }

        let ttl_remaining = self.store.ttl(&url_key).await?;
        let clicks = self.store.get(&clicks_key(code)).await?;
        let meta = self.store.hget_all(&meta_key(code)).await?;

        // The key may expire between the existence check and this read.
        let Some(original_url) = self.store.get(&url_key).await? else {
            return Err(link_not_found(code));
        };

        Ok(LinkStats {
            code: code.to_string(),
            original_url,
            click_count: parse_or_zero(clicks.as_deref(), "clicks", code),
            ttl_remaining: if ttl_remaining < 0 { -1 } else { ttl_remaining },
            created_at: meta_field(&meta, "created_at", code),
            ttl_sec: meta_field(&meta, "ttl_sec", code),
        })
    }

    /// Returns up to `limit` links ordered by click count, highest first.
    ///
    /// Ties are ordered by the store. Entries are not removed when links expire,
    /// so the ranking may include expired codes.
    pub async fn get_top(&self, limit: usize) -> Result<Vec<TopLink>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let stop = isize::try_from(limit - 1).unwrap_or(isize::MAX);
        let entries = self
            .store
            .zrevrange_with_scores(POPULAR_LINKS, 0, stop)
            .await?;

        Ok(entries
            .into_iter()
            .map(|(code, score)| TopLink {
                code,
                clicks: score.max(0.0) as u64,
            })
            .collect())
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    async fn claim(&self, code: &str, url: &str, ttl: Option<u64>) -> Result<bool, AppError> {
        Ok(self.store.set_if_absent(&url_key(code), url, ttl).await?)
    }

    async fn claim_random_code(&self, url: &str, ttl: Option<u64>) -> Result<String, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code(self.code_length);

            if self.claim(&code, url, ttl).await? {
                return Ok(code);
            }

            warn!(attempt, "Generated code collided, retrying");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    async fn write_link_records(&self, code: &str, ttl: Option<u64>) -> Result<(), AppError> {
        let meta_key = meta_key(code);
        let clicks_key = clicks_key(code);

        let mut commands = vec![
            KvCommand::HashSet {
                key: meta_key.clone(),
                fields: vec![
                    ("created_at".to_string(), Utc::now().timestamp().to_string()),
                    ("ttl_sec".to_string(), ttl.unwrap_or(0).to_string()),
                ],
            },
            KvCommand::Set {
                key: clicks_key.clone(),
                value: "0".to_string(),
            },
        ];

        if let Some(seconds) = ttl {
            commands.push(KvCommand::Expire {
                key: meta_key,
                seconds,
            });
            commands.push(KvCommand::Expire {
                key: clicks_key,
                seconds,
            });
        }

        Ok(self.store.execute(commands).await?)
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Code not found or expired", json!({ "code": code }))
}

fn parse_or_zero<T: std::str::FromStr + Default>(
    value: Option<&str>,
    field: &str,
    code: &str,
) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(code, field, raw, "Unparseable stored value, reporting 0");
            T::default()
        }),
        None => T::default(),
    }
}

fn meta_field<T: std::str::FromStr + Default>(
    meta: &HashMap<String, String>,
    field: &str,
    code: &str,
) -> T {
    parse_or_zero(meta.get(field).map(String::as_str), field, code)
}
