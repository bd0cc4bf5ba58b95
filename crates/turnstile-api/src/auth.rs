//! # Authentication Gate & Middleware
//!
//! Every request passes the gate exactly once, before handler dispatch:
//!
//! ```text
//! whitelisted path ──────────────────────────────► Public (token ignored)
//! otherwise: Authorization: Bearer <token>
//!            └─► TokenService::validate ──ok────► Authenticated(Principal)
//!                                       └─err───► 401 Bad credentials
//! ```
//!
//! The gate itself ([`AuthenticationGate::check`]) is a plain async
//! function of the path and the header value so it can be exercised
//! without a router. [`auth_middleware`] wraps it for axum, consults the
//! [`AccessDecision`](crate::access::AccessDecision), and injects the
//! [`Principal`] into request extensions for the [`CurrentUser`] extractor.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use turnstile_auth::{AuthError, Principal, TokenService};
use turnstile_core::SecurityError;

use crate::error::AppError;
use crate::state::AppState;
use crate::whitelist::Whitelist;

const BEARER_PREFIX: &str = "Bearer ";

/// Result of a successful gate pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Whitelisted path. No identity is attached.
    Public,
    Authenticated(Principal),
}

impl GateOutcome {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Public => None,
            Self::Authenticated(p) => Some(p),
        }
    }
}

#[derive(Debug)]
pub struct AuthenticationGate {
    whitelist: Whitelist,
    tokens: Arc<TokenService>,
}

impl AuthenticationGate {
    pub fn new(whitelist: Whitelist, tokens: Arc<TokenService>) -> Self {
        Self { whitelist, tokens }
    }

    /// Authenticate a request for `path` carrying `authorization`.
    ///
    /// Stateless and idempotent: the same inputs against the same store give
    /// the same outcome.
    pub async fn check(
        &self,
        path: &str,
        authorization: Option<&str>,
    ) -> Result<GateOutcome, AuthError> {
        if self.whitelist.is_whitelisted(path) {
            return Ok(GateOutcome::Public);
        }
        let token = bearer_token(authorization)?;
        let principal = self.tokens.validate(token).await?;
        Ok(GateOutcome::Authenticated(principal))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(authorization: Option<&str>) -> Result<&str, SecurityError> {
    let value = authorization
        .ok_or_else(|| SecurityError::BadCredentials("missing authorization header".into()))?;
    let token = value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        SecurityError::BadCredentials("authorization header must use Bearer scheme".into())
    })?;
    let token = token.trim();
    if token.is_empty() {
        return Err(SecurityError::BadCredentials("empty bearer token".into()));
    }
    Ok(token)
}

/// Gate every request, then apply the access decision.
///
/// Rejections are rendered through [`AppError`] so they carry the same
/// `vnd.error` body as handler errors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let outcome = match state.gate.check(&path, authorization).await {
        Ok(outcome) => outcome,
        Err(err) => {
            match &err {
                AuthError::Security(e) => {
                    tracing::warn!(%path, reason = %e, "authentication failed")
                }
                other => tracing::error!(%path, error = %other, "authentication aborted"),
            }
            return AppError::from(err).into_response();
        }
    };

    if let Err(err) = state.access.authorize(outcome.principal(), &path) {
        return AppError::from(err).into_response();
    }

    if let GateOutcome::Authenticated(principal) = outcome {
        tracing::debug!(username = %principal.username(), %path, "request authenticated");
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}

/// The authenticated principal of the current request.
///
/// Rejects with 401 when the gate attached no identity, which only happens
/// on whitelisted paths.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                SecurityError::BadCredentials("no authenticated principal in request context".into())
                    .into()
            })
    }
}
