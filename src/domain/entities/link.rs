//! Link entities: creation input, statistics record, ranking entry.

/// Longest accepted link lifetime (ten years, in seconds).
pub const MAX_TTL_SECONDS: u64 = 315_360_000;

/// Input data for creating a new short link.
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub original_url: String,
    /// Lifetime in seconds; `None` or `Some(0)` means the link never expires.
    pub ttl_sec: Option<u64>,
    /// Forces this code instead of a generated one.
    pub custom_code: Option<String>,
}

impl NewLink {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    pub fn with_ttl(mut self, ttl_sec: u64) -> Self {
        self.ttl_sec = Some(ttl_sec);
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    /// TTL to apply in the store, with `0` folded into "no expiry".
    pub fn effective_ttl(&self) -> Option<u64> {
        self.ttl_sec.filter(|ttl| *ttl > 0)
    }
}

/// Statistics for a live short link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    pub code: String,
    pub original_url: String,
    pub click_count: u64,
    /// Seconds until the link expires, or `-1` when it has no expiry.
    pub ttl_remaining: i64,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    /// Configured lifetime; `0` means no expiry.
    pub ttl_sec: u64,
}

impl LinkStats {
    pub fn expires(&self) -> bool {
        self.ttl_remaining >= 0
    }
}

/// A code and its click count, as ranked by popularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLink {
    pub code: String,
    pub clicks: u64,
}
