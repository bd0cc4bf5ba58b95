//! # API Error Types
//!
//! Maps [`SecurityError`] and internal failures to HTTP responses.
//!
//! Every security error kind maps to exactly one status and title through an
//! exhaustive `match`. The body is a `vnd.error` document:
//!
//! ```text
//! Content-Type: application/vnd.error
//! {"message": "<title>", "logref": "<detail message>"}
//! ```
//!
//! Internal failures (user store down, token signing broken) return 500 with
//! a generic body. Their details are logged and never returned.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use turnstile_auth::AuthError;
use turnstile_core::SecurityError;

/// Media type of every error response.
pub const VND_ERROR: &str = "application/vnd.error";

/// Title of the 500 response.
pub const INTERNAL_TITLE: &str = "Internal Error";

const INTERNAL_LOGREF: &str = "An internal error occurred";

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VndError {
    /// Fixed title of the error kind.
    pub message: String,
    /// Detail message of the specific failure.
    pub logref: String,
}

/// Return the HTTP status and title for a security error kind.
pub fn status_and_title(err: &SecurityError) -> (StatusCode, &'static str) {
    match err {
        SecurityError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "Not Found Error"),
        SecurityError::ResourceAlreadyExists(_) => (StatusCode::CONFLICT, "Already Exist Error"),
        SecurityError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
        SecurityError::AccessDenied(_) => (StatusCode::FORBIDDEN, "Forbidden"),
        SecurityError::BadCredentials(_) => (StatusCode::UNAUTHORIZED, "Bad credentials"),
        SecurityError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Illegal arguments"),
    }
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A failure the caller caused. Mapped by kind.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, VndError) {
        match self {
            Self::Security(err) => {
                let (status, title) = status_and_title(err);
                let body = VndError {
                    message: title.to_string(),
                    logref: err.message().to_string(),
                };
                (status, body)
            }
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                VndError {
                    message: INTERNAL_TITLE.to_string(),
                    logref: INTERNAL_LOGREF.to_string(),
                },
            ),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Security(e) => Self::Security(e),
            AuthError::Lookup(e) => Self::Internal(e.to_string()),
            AuthError::Signing(msg) => Self::Internal(format!("token signing failed: {msg}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Security(err) => {
                tracing::debug!(kind = err.kind(), detail = %err, "request failed")
            }
        }

        let (status, body) = self.status_and_body();
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(VND_ERROR))],
            Json(body),
        )
            .into_response()
    }
}
