//! DTOs for per-link statistics.

use serde::Serialize;

use crate::domain::entities::LinkStats;

/// Statistics for a specific short link.
///
/// `ttl_remaining` is `-1` for links without expiry; `ttl_sec` is `0` for them.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub original: String,
    pub clicks: u64,
    pub ttl_remaining: i64,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    pub ttl_sec: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            code: stats.code,
            original: stats.original_url,
            clicks: stats.click_count,
            ttl_remaining: stats.ttl_remaining,
            created_at: stats.created_at,
            ttl_sec: stats.ttl_sec,
        }
    }
}
