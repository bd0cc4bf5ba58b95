//! # Login API
//!
//! `POST /api/v1/login` exchanges a username and password for a bearer
//! token. `POST /api/v1/login/token` answers whether a raw token is
//! currently valid; it never fails with 401.

use axum::extract::rejection::{JsonRejection, StringRejection};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use turnstile_auth::AuthError;
use turnstile_core::SecurityError;

use crate::error::AppError;
use crate::extractors::{extract_json, extract_text};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/api/v1/login";
pub const TOKEN_CHECK_PATH: &str = "/api/v1/login/token";

/// Login request.
///
/// Custom `Debug` redacts the password.
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginRequest {
    fn validate(&self) -> Result<(), SecurityError> {
        if self.username.trim().is_empty() {
            return Err(SecurityError::InvalidArgument("username must not be blank".into()));
        }
        if self.password.is_empty() {
            return Err(SecurityError::InvalidArgument("password must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, post(login))
        .route(TOKEN_CHECK_PATH, post(check_token))
}

/// POST /api/v1/login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_json(body)?;
    req.validate()?;

    let principal = state
        .authenticator
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.tokens.issue(&principal).map_err(AuthError::from)?;

    tracing::info!(username = %principal.username(), expires_at = %token.expires_at(), "login succeeded");
    Ok(Json(LoginResponse {
        username: principal.username().to_string(),
        token: token.into_string(),
    }))
}

/// POST /api/v1/login/token
async fn check_token(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<Json<bool>, AppError> {
    let raw = extract_text(body)?;
    match state.tokens.validate(raw.trim()).await {
        Ok(principal) => {
            tracing::debug!(username = %principal.username(), "token check: valid");
            Ok(Json(true))
        }
        Err(AuthError::Security(reason)) => {
            tracing::debug!(%reason, "token check: invalid");
            Ok(Json(false))
        }
        Err(other) => Err(other.into()),
    }
}
