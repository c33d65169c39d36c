//! Handler for link shortening endpoint.

use axum::{Extension, Json, extract::State};
use tracing::debug;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten` (bearer token required)
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "ttl_sec": 3600,         // optional, 0 or absent = never expires
///   "custom_code": "promo"   // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "code": "promo", "short_url": "http://localhost:8000/promo" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL or custom code, or a `ttl_sec` above ten years.
/// Returns 409 Conflict if the custom code is already in use.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(username)): Extension<AuthenticatedUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let code = state.link_service.create_link(payload.into()).await?;
    let short_url = state.link_service.short_url(&state.base_url, &code);

    debug!(%username, %code, "Link shortened");

    Ok(Json(ShortenResponse { code, short_url }))
}
