//! # Authentication Error Types
//!
//! [`AuthError`] separates failures the caller caused (a [`SecurityError`])
//! from failures of the user store or of token signing, which are never the
//! caller's fault and must not be reported as bad credentials.
//!
//! [`TokenError`] is the detailed reason a token was refused. It collapses
//! into `SecurityError::BadCredentials` at the boundary.

use thiserror::Error;
use turnstile_core::{LookupError, SecurityError};

/// Errors from authentication operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller's credentials or token were rejected, or access was denied.
    #[error(transparent)]
    Security(#[from] SecurityError),

    /// The user store failed. No identity was established.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Why a bearer token was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not a well-formed token (bad structure, encoding or claims).
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signed with a different secret or tampered with.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The current time is at or past the token's expiry.
    #[error("token expired")]
    Expired,

    /// Signature and expiry are fine but the subject no longer exists.
    #[error("unknown token subject")]
    UnknownSubject,

    /// Signing failed while issuing.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => Self::Signing(msg),
            other => Self::Security(SecurityError::BadCredentials(other.to_string())),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}
