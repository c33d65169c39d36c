//! DTOs for the popularity ranking endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::TopLink;

pub const DEFAULT_TOP_LIMIT: usize = 10;
pub const MAX_TOP_LIMIT: usize = 1000;

/// Query parameters for `GET /top`.
///
/// Uses `serde_with` to parse the limit from the query string as an integer.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TopQuery {
    /// Resolves the requested limit.
    ///
    /// Defaults to 10; must be within `1..=1000`.
    pub fn validated_limit(&self) -> Result<usize, String> {
        let limit = self.limit.unwrap_or(DEFAULT_TOP_LIMIT);

        if !(1..=MAX_TOP_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {}", MAX_TOP_LIMIT));
        }

        Ok(limit)
    }
}

#[derive(Debug, Serialize)]
pub struct TopItem {
    pub code: String,
    pub clicks: u64,
}

impl From<TopLink> for TopItem {
    fn from(link: TopLink) -> Self {
        Self {
            code: link.code,
            clicks: link.clicks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<usize>) -> TopQuery {
        TopQuery { limit }
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(query(None).validated_limit().unwrap(), 10);
    }

    #[test]
    fn test_limit_bounds() {
        assert_eq!(query(Some(1)).validated_limit().unwrap(), 1);
        assert_eq!(query(Some(1000)).validated_limit().unwrap(), 1000);
        assert!(query(Some(0)).validated_limit().is_err());
        assert!(query(Some(1001)).validated_limit().is_err());
    }

    #[test]
    fn test_limit_parsed_from_string() {
        let q: TopQuery = serde_json::from_str(r#"{"limit": "25"}"#).unwrap();
        assert_eq!(q.limit, Some(25));

        let q: TopQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, None);

        assert!(serde_json::from_str::<TopQuery>(r#"{"limit": "many"}"#).is_err());
    }
}
