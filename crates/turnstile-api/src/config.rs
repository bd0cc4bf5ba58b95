//! # Configuration
//!
//! Built once at startup from the environment, then shared immutably.
//!
//! | Variable                   | Default              |
//! |----------------------------|----------------------|
//! | `TURNSTILE_TOKEN_SECRET`   | required             |
//! | `TURNSTILE_TOKEN_TTL_SECS` | `86400`              |
//! | `TURNSTILE_WHITELIST`      | [`DEFAULT_WHITELIST`] |
//! | `TURNSTILE_USERS_FILE`     | none (empty store)   |
//! | `PORT`                     | `8080`               |
//!
//! There is no default signing secret.
//!
//! [`DEFAULT_WHITELIST`]: crate::whitelist::DEFAULT_WHITELIST

use std::path::PathBuf;

use thiserror::Error;
use turnstile_auth::ttl_from_secs;
use zeroize::Zeroizing;

use crate::access::{default_role_rules, RoleRule};
use crate::whitelist::Whitelist;

pub const ENV_TOKEN_SECRET: &str = "TURNSTILE_TOKEN_SECRET";
pub const ENV_TOKEN_TTL_SECS: &str = "TURNSTILE_TOKEN_TTL_SECS";
pub const ENV_WHITELIST: &str = "TURNSTILE_WHITELIST";
pub const ENV_USERS_FILE: &str = "TURNSTILE_USERS_FILE";
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Token signing and request gating settings.
///
/// Custom `Debug` redacts the secret to prevent credential leakage in logs.
#[derive(Clone)]
pub struct SecurityConfig {
    secret: Zeroizing<Vec<u8>>,
    pub token_ttl: chrono::Duration,
    pub whitelist: Whitelist,
    pub role_rules: Vec<RoleRule>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl.num_seconds())
            .field("whitelist", &self.whitelist)
            .field("role_rules", &self.role_rules)
            .finish()
    }
}

impl SecurityConfig {
    /// Settings with the given secret and every other value at its default.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            token_ttl: chrono::Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            whitelist: Whitelist::default(),
            role_rules: default_role_rules(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = whitelist;
        self
    }

    pub fn with_role_rules(mut self, rules: Vec<RoleRule>) -> Self {
        self.role_rules = rules;
        self
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup(ENV_TOKEN_SECRET).ok_or(ConfigError::Missing(ENV_TOKEN_SECRET))?;
        if secret.is_empty() {
            return Err(ConfigError::Invalid {
                var: ENV_TOKEN_SECRET,
                reason: "must not be empty".into(),
            });
        }
        let mut config = Self::new(secret);

        if let Some(raw) = lookup(ENV_TOKEN_TTL_SECS) {
            let secs: i64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: ENV_TOKEN_TTL_SECS,
                reason: format!("{e}"),
            })?;
            config.token_ttl = ttl_from_secs(secs).map_err(|e| ConfigError::Invalid {
                var: ENV_TOKEN_TTL_SECS,
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = lookup(ENV_WHITELIST) {
            let patterns: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            config.whitelist = Whitelist::new(patterns);
        }

        Ok(config)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// YAML file seeding the in-memory user store.
    pub users_file: Option<PathBuf>,
    pub security: SecurityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup(ENV_PORT) {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: ENV_PORT,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };
        let users_file = lookup(ENV_USERS_FILE)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            port,
            users_file,
            security: SecurityConfig::from_lookup(&lookup)?,
        })
    }
}
