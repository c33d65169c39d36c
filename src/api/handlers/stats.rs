//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves statistics for a specific short link.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "code": "abc1234",
///   "original": "https://example.com",
///   "clicks": 3,
///   "ttl_remaining": 1790,
///   "created_at": 1767225600,
///   "ttl_sec": 1800
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.get_stats(&code).await?;

    Ok(Json(stats.into()))
}
