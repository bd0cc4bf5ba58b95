//! # Credential Authentication
//!
//! Turns a username/password pair into a [`Principal`]: look the user up,
//! then compare the password against the stored digest. Both an unknown
//! username and a wrong password fail with the same
//! `SecurityError::BadCredentials`, so callers cannot enumerate usernames.

use std::sync::Arc;

use turnstile_core::{SecurityError, UserLookup};

use crate::error::AuthError;
use crate::password::PasswordVerifier;
use crate::principal::Principal;

pub struct CredentialAuthenticator {
    users: Arc<dyn UserLookup>,
    verifier: Arc<dyn PasswordVerifier>,
}

impl CredentialAuthenticator {
    pub fn new(users: Arc<dyn UserLookup>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self { users, verifier }
    }

    /// Authenticate a username/password pair.
    pub async fn authenticate(
        &self,
        username: &str,
        raw_password: &str,
    ) -> Result<Principal, AuthError> {
        let Some(record) = self.users.find_by_username(username).await? else {
            tracing::info!(%username, "login rejected: unknown user");
            return Err(SecurityError::invalid_login().into());
        };

        if !self.verifier.matches(raw_password, &record.password_digest) {
            tracing::info!(%username, "login rejected: password mismatch");
            return Err(SecurityError::invalid_login().into());
        }

        tracing::debug!(%username, roles = ?record.roles, "credentials verified");
        Ok(Principal::from_record(record))
    }
}
