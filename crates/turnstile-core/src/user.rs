//! # User Records
//!
//! The credential-bearing record owned by the external user store. The
//! authentication core reads these records and never writes them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SecurityError;

/// Role names known to the application.
///
/// Records store roles as plain strings so a store may carry roles this
/// enum does not name; `UserRole` covers the ones the API itself checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular account.
    User,
    /// Full access, including administrator-only endpoints.
    Administrator,
}

impl UserRole {
    /// Return the string stored in user records for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Administrator => "ADMINISTRATOR",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as held by the store: identity, password digest and roles.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// One-way digest of the password. Never the clear text.
    pub password_digest: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_digest", &"[REDACTED]")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish()
    }
}

/// Default e-mail address used by the factory helpers.
pub const DEFAULT_EMAIL: &str = "prova@server.com";

impl UserRecord {
    /// Build a record, rejecting a blank username or an empty digest.
    pub fn new(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        roles: impl IntoIterator<Item = String>,
    ) -> Result<Self, SecurityError> {
        let record = Self {
            username: username.into(),
            password_digest: password_digest.into(),
            name: String::new(),
            surname: String::new(),
            email: DEFAULT_EMAIL.to_string(),
            roles: roles.into_iter().collect(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Build an administrator account.
    pub fn administrator(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Result<Self, SecurityError> {
        Self::with_role(UserRole::Administrator, username, password_digest, name, surname)
    }

    /// Build a regular account.
    pub fn regular(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Result<Self, SecurityError> {
        Self::with_role(UserRole::User, username, password_digest, name, surname)
    }

    fn with_role(
        role: UserRole,
        username: impl Into<String>,
        password_digest: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Result<Self, SecurityError> {
        let mut record = Self::new(username, password_digest, [role.as_str().to_string()])?;
        record.name = name.into();
        record.surname = surname.into();
        Ok(record)
    }

    /// Replace the e-mail address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Check the invariants every stored record must hold.
    pub fn validate(&self) -> Result<(), SecurityError> {
        if self.username.trim().is_empty() {
            return Err(SecurityError::InvalidArgument(
                "username must not be blank".into(),
            ));
        }
        if self.password_digest.is_empty() {
            return Err(SecurityError::InvalidArgument(format!(
                "user '{}' has an empty password digest",
                self.username
            )));
        }
        Ok(())
    }

    /// Whether the record carries the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(role.as_str())
    }
}
