//! # Error Taxonomy
//!
//! Structured error types for Turnstile, built with `thiserror`.
//!
//! [`SecurityError`] is the closed set of failures that reach a caller as a
//! structured error response. Each variant carries a human-readable message.
//! The HTTP layer maps every variant to exactly one status code with an
//! exhaustive `match`, so adding a variant without a mapping fails to compile.
//!
//! [`LookupError`] is not part of that set: it describes a failure of the
//! external user store and is reported as an internal error.

use thiserror::Error;

/// Failures surfaced to callers as structured error responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// The requested resource does not exist.
    #[error("{0}")]
    ResourceNotFound(String),

    /// A resource with the same identity already exists.
    #[error("{0}")]
    ResourceAlreadyExists(String),

    /// The request could not be understood.
    #[error("{0}")]
    BadRequest(String),

    /// The caller is known but not permitted to perform the operation.
    #[error("{0}")]
    AccessDenied(String),

    /// The caller could not prove who they are.
    #[error("{0}")]
    BadCredentials(String),

    /// An argument failed validation.
    #[error("{0}")]
    InvalidArgument(String),
}

impl SecurityError {
    /// Message shown to the caller when a username/password pair is rejected.
    ///
    /// Unknown usernames and wrong passwords share this text.
    pub const INVALID_LOGIN: &'static str = "Invalid username/password supplied";

    /// Message shown when access is denied without a more specific reason.
    pub const NO_PERMISSION: &'static str =
        "You do not have the permission to execute this operation";

    /// Build a `ResourceNotFound` for a resource identifier.
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::ResourceNotFound(format!("Could not find resource with id: '{id}'"))
    }

    /// Build a `ResourceAlreadyExists` for a resource identifier.
    pub fn already_exists(id: impl std::fmt::Display) -> Self {
        Self::ResourceAlreadyExists(format!("Resource with ID: '{id}' already exists."))
    }

    /// Build the generic login rejection.
    pub fn invalid_login() -> Self {
        Self::BadCredentials(Self::INVALID_LOGIN.to_string())
    }

    /// Build the generic permission denial.
    pub fn no_permission() -> Self {
        Self::AccessDenied(Self::NO_PERMISSION.to_string())
    }

    /// The detail message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::ResourceNotFound(m)
            | Self::ResourceAlreadyExists(m)
            | Self::BadRequest(m)
            | Self::AccessDenied(m)
            | Self::BadCredentials(m)
            | Self::InvalidArgument(m) => m,
        }
    }

    /// Stable snake_case name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::ResourceAlreadyExists(_) => "resource_already_exists",
            Self::BadRequest(_) => "bad_request",
            Self::AccessDenied(_) => "access_denied",
            Self::BadCredentials(_) => "bad_credentials",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

/// Failure of the external user store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The store could not be reached or answered with an error.
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}
