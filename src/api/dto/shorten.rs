//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::NewLink;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Target URL (absolute `http`/`https`; checked in depth by the link service).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    /// Lifetime in seconds. Absent or `0` means the link never expires.
    #[validate(range(max = 315_360_000, message = "ttl_sec must be at most 315360000 (10 years)"))]
    pub ttl_sec: Option<u64>,

    /// Caller-chosen code instead of a generated one.
    pub custom_code: Option<String>,
}

impl From<ShortenRequest> for NewLink {
    fn from(req: ShortenRequest) -> Self {
        NewLink {
            original_url: req.url,
            ttl_sec: req.ttl_sec,
            custom_code: req.custom_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}
