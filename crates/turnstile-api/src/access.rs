//! # Access Decision
//!
//! Runs after the authentication gate. An absent principal is only
//! acceptable on a whitelisted path; an authenticated principal must hold
//! the role of the first [`RoleRule`] whose pattern matches the path.
//! Paths no rule names are open to any authenticated principal.
//!
//! Authentication failures (401) and authorization failures (403) stay
//! distinct: no principal on a protected path is `BadCredentials`, a
//! principal without the required role is `AccessDenied`.

use turnstile_auth::Principal;
use turnstile_core::{SecurityError, UserRole};

use crate::whitelist::{PathPattern, Whitelist};

/// Message for a protected request that reached the decision without an identity.
pub const AUTHENTICATION_REQUIRED: &str =
    "Full authentication is required to access this resource";

/// A path pattern and the role required to access it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRule {
    pattern: PathPattern,
    role: String,
}

impl RoleRule {
    pub fn new(pattern: &str, role: impl Into<String>) -> Self {
        Self {
            pattern: PathPattern::new(pattern),
            role: role.into(),
        }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

/// Role rules applied when none are configured.
pub fn default_role_rules() -> Vec<RoleRule> {
    vec![RoleRule::new(
        "/api/v1/alive/secret",
        UserRole::Administrator.as_str(),
    )]
}

#[derive(Debug, Clone)]
pub struct AccessDecision {
    whitelist: Whitelist,
    rules: Vec<RoleRule>,
}

impl AccessDecision {
    pub fn new(whitelist: Whitelist, rules: Vec<RoleRule>) -> Self {
        Self { whitelist, rules }
    }

    pub fn rules(&self) -> &[RoleRule] {
        &self.rules
    }

    /// Decide whether a request for `path` may proceed.
    pub fn authorize(&self, principal: Option<&Principal>, path: &str) -> Result<(), SecurityError> {
        let Some(principal) = principal else {
            if self.whitelist.is_whitelisted(path) {
                return Ok(());
            }
            tracing::warn!(%path, "access denied: no authenticated principal");
            return Err(SecurityError::BadCredentials(AUTHENTICATION_REQUIRED.into()));
        };

        match self.rules.iter().find(|rule| rule.pattern.matches(path)) {
            Some(rule) if !principal.has_role(&rule.role) => {
                tracing::warn!(
                    username = %principal.username(),
                    %path,
                    required_role = %rule.role,
                    "access denied: missing role"
                );
                Err(SecurityError::no_permission())
            }
            _ => Ok(()),
        }
    }
}

impl Default for AccessDecision {
    fn default() -> Self {
        Self::new(Whitelist::default(), default_role_rules())
    }
}
