//! # Bearer Tokens
//!
//! Self-contained HS256 JWTs signed with a process-wide secret. The server
//! keeps no registry of issued tokens: validity is recomputed from the
//! signature and the `exp` claim on every check.
//!
//! ## Claims
//!
//! ```text
//! { "sub": "<username>", "roles": [...], "iat": <unix secs>, "exp": <unix secs> }
//! ```
//!
//! ## Role Freshness
//!
//! `roles` is informational for clients. [`TokenService::validate`] looks
//! the subject up again and takes roles from the store, so a role change
//! applies on the next request even for tokens issued before it, and a
//! deleted user's tokens stop working immediately.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use turnstile_core::{SecurityError, UserLookup};

use crate::clock::{Clock, SystemClock};
use crate::error::{AuthError, TokenError};
use crate::principal::Principal;

/// Longest token lifetime accepted, in seconds (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 86_400;

/// Convert a lifetime in seconds into a token TTL.
///
/// Accepts `1..=MAX_TOKEN_TTL_SECS`.
pub fn ttl_from_secs(secs: i64) -> Result<Duration, SecurityError> {
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(SecurityError::InvalidArgument(format!(
            "token lifetime must be between 1 and {MAX_TOKEN_TTL_SECS} seconds, got {secs}"
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        SecurityError::InvalidArgument(format!("token lifetime of {secs} seconds is out of range"))
    })
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued for.
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch. Invalid from this instant on.
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// An issued token.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues and validates bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    users: Arc<dyn UserLookup>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenService {
    /// Create a service signing with `secret`, issuing tokens valid for `ttl`.
    ///
    /// Rejects an empty secret and a lifetime outside `1..=MAX_TOKEN_TTL_SECS`
    /// seconds.
    pub fn new(
        secret: &[u8],
        ttl: Duration,
        users: Arc<dyn UserLookup>,
    ) -> Result<Self, SecurityError> {
        if secret.is_empty() {
            return Err(SecurityError::InvalidArgument(
                "token signing secret must not be empty".into(),
            ));
        }
        if ttl <= Duration::zero() || ttl.num_seconds() > MAX_TOKEN_TTL_SECS {
            return Err(SecurityError::InvalidArgument(format!(
                "token lifetime must be between 1 and {MAX_TOKEN_TTL_SECS} seconds, got {}s",
                ttl.num_seconds()
            )));
        }

        // Expiry is checked against the injected clock, not by the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            users,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for an authenticated principal.
    pub fn issue(&self, principal: &Principal) -> Result<Token, TokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing(format!("expiry out of range for issue time {now}")))?;
        let claims = Claims {
            sub: principal.username().to_string(),
            roles: principal.roles().iter().cloned().collect(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let value = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        tracing::debug!(username = %claims.sub, expires_at = %expires_at, "token issued");
        Ok(Token { value, expires_at })
    }

    /// Check signature, structure and expiry without consulting the store.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }

    /// Validate a token and re-derive the principal from the user store.
    pub async fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.decode(token)?;
        match self.users.find_by_username(&claims.sub).await? {
            Some(record) => Ok(Principal::from_record(record)),
            None => {
                tracing::info!(username = %claims.sub, "token subject no longer exists");
                Err(TokenError::UnknownSubject.into())
            }
        }
    }
}
