//! Handlers for account registration and login.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "secret123" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the input is invalid or the username is taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    payload.validate()?;

    state
        .account_service
        .create_user(&payload.username, &payload.password)
        .await
        .map_err(|err| match err {
            AppError::Conflict { message, details } => AppError::bad_request(message, details),
            other => other,
        })?;

    Ok(Json(RegisterResponse { ok: true }))
}

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// Returns 401 Unauthorized for unknown users and wrong passwords alike.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    if !state
        .account_service
        .verify_user(&payload.username, &payload.password)
        .await?
    {
        return Err(AppError::unauthorized(
            "Invalid credentials",
            json!({ "reason": "Username or password is incorrect" }),
        ));
    }

    let token = state.token_service.issue_access_token(&payload.username)?;

    info!(username = %payload.username, "Access token issued");

    Ok(Json(LoginResponse::bearer(token)))
}
