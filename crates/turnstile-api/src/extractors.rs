//! # Request Body Extraction
//!
//! Helpers that turn axum body rejections into `BadRequest` security errors
//! so malformed input gets the same `vnd.error` response as everything else.

use axum::extract::rejection::{JsonRejection, StringRejection};
use axum::Json;
use turnstile_core::SecurityError;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to `BadRequest`.
///
/// Handlers take `Result<Json<T>, JsonRejection>` and call this first:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| SecurityError::BadRequest(err.body_text()).into())
}

/// Extract a UTF-8 text body, mapping rejections to `BadRequest`.
pub fn extract_text(result: Result<String, StringRejection>) -> Result<String, AppError> {
    result.map_err(|err| SecurityError::BadRequest(err.body_text()).into())
}
