//! # User Lookup
//!
//! The capability the authentication core consumes from the persistence
//! layer: resolve a username to its record. A missing user is `Ok(None)`,
//! never an error; errors are reserved for store failures.
//!
//! [`InMemoryUserStore`] is the bundled implementation, used by the API
//! binary (seeded from a users file) and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{LookupError, SecurityError};
use crate::user::UserRecord;

/// Resolve usernames to user records.
///
/// Implementations may suspend on I/O. They must be safe to call from many
/// requests at once.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Find the record for `username`, or `None` when no such user exists.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, LookupError>;
}

/// Thread-safe, cloneable in-memory user store keyed by username.
///
/// The lock is `parking_lot` and is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, rejecting duplicate usernames.
    pub fn from_records(
        records: impl IntoIterator<Item = UserRecord>,
    ) -> Result<Self, SecurityError> {
        let store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Add a new user. Fails if the username is taken or the record is invalid.
    pub fn insert(&self, record: UserRecord) -> Result<(), SecurityError> {
        record.validate()?;
        let mut users = self.users.write();
        if users.contains_key(&record.username) {
            return Err(SecurityError::already_exists(&record.username));
        }
        users.insert(record.username.clone(), record);
        Ok(())
    }

    /// Remove a user, returning the removed record.
    pub fn remove(&self, username: &str) -> Result<UserRecord, SecurityError> {
        self.users
            .write()
            .remove(username)
            .ok_or_else(|| SecurityError::not_found(username))
    }

    /// Replace the roles of an existing user.
    pub fn set_roles(
        &self,
        username: &str,
        roles: impl IntoIterator<Item = String>,
    ) -> Result<(), SecurityError> {
        let mut users = self.users.write();
        let record = users
            .get_mut(username)
            .ok_or_else(|| SecurityError::not_found(username))?;
        record.roles = roles.into_iter().collect();
        Ok(())
    }

    /// Number of users held.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Whether the store holds no users.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserLookup for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, LookupError> {
        Ok(self.users.read().get(username).cloned())
    }
}
