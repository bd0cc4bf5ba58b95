//! # Principal
//!
//! The authenticated identity attached to a request.
//!
//! A `Principal` can only be built inside this crate, by
//! [`CredentialAuthenticator`](crate::CredentialAuthenticator) after a
//! password check or by [`TokenService`](crate::TokenService) after a
//! signature and expiry check. Nothing outside the crate can turn
//! unauthenticated input into one.

use std::collections::BTreeSet;
use std::sync::Arc;

use turnstile_core::{UserRecord, UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    roles: BTreeSet<String>,
    record: Arc<UserRecord>,
}

impl Principal {
    pub(crate) fn from_record(record: UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            roles: record.roles.clone(),
            record: Arc::new(record),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// The store record this identity was derived from.
    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Administrator.as_str())
    }
}
