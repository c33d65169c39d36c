//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// Every successful lookup increments the click counter and updates the
/// popularity ranking before responding. If recording the click fails the
/// error is logged and the redirect is still served.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let Some(original_url) = state.link_service.fetch_url(&code).await? else {
        debug!(%code, "Redirect MISS");
        return Err(AppError::not_found(
            "Code not found or expired",
            json!({ "code": code }),
        ));
    };

    if let Err(e) = state.link_service.increment_clicks(&code).await {
        error!(%code, "Failed to record click: {}", e);
    }

    Ok(Redirect::temporary(&original_url))
}
