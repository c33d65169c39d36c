//! Handler for the popularity ranking.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::top::{TopItem, TopQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Lists the most clicked links.
///
/// # Endpoint
///
/// `GET /top?limit=N`
///
/// # Query Parameters
///
/// - `limit` (optional): Number of entries (default: 10, range: 1-1000)
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` is out of range.
pub async fn top_handler(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopItem>>, AppError> {
    let limit = query
        .validated_limit()
        .map_err(|e| AppError::bad_request(e, json!({ "limit": query.limit })))?;

    let top = state.link_service.get_top(limit).await?;

    Ok(Json(top.into_iter().map(TopItem::from).collect()))
}
