//! # Application State
//!
//! Shared, immutable services handed to the middleware and every handler.
//! Clone-friendly: everything sits behind an `Arc`.

use std::sync::Arc;

use turnstile_auth::{
    Clock, CredentialAuthenticator, PasswordVerifier, Sha256PasswordVerifier, SystemClock,
    TokenService,
};
use turnstile_core::{SecurityError, UserLookup};

use crate::access::AccessDecision;
use crate::auth::AuthenticationGate;
use crate::config::SecurityConfig;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthenticationGate>,
    pub access: Arc<AccessDecision>,
    pub authenticator: Arc<CredentialAuthenticator>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire the services against `users`, using wall-clock time.
    pub fn new(security: &SecurityConfig, users: Arc<dyn UserLookup>) -> Result<Self, SecurityError> {
        Self::with_clock(security, users, Arc::new(SystemClock))
    }

    /// Wire the services with an explicit time source.
    pub fn with_clock(
        security: &SecurityConfig,
        users: Arc<dyn UserLookup>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SecurityError> {
        let verifier: Arc<dyn PasswordVerifier> = Arc::new(Sha256PasswordVerifier);
        let tokens = Arc::new(
            TokenService::new(security.secret(), security.token_ttl, users.clone())?
                .with_clock(clock),
        );
        Ok(Self {
            gate: Arc::new(AuthenticationGate::new(
                security.whitelist.clone(),
                tokens.clone(),
            )),
            access: Arc::new(AccessDecision::new(
                security.whitelist.clone(),
                security.role_rules.clone(),
            )),
            authenticator: Arc::new(CredentialAuthenticator::new(users, verifier)),
            tokens,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gate", &self.gate)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}
