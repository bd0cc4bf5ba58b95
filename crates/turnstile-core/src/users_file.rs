//! # Users File
//!
//! Seeds an [`InMemoryUserStore`] from a YAML document:
//!
//! ```yaml
//! users:
//!   - username: alice
//!     password_digest: 2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b
//!     name: Alice
//!     roles: [USER]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::SecurityError;
use crate::lookup::InMemoryUserStore;
use crate::user::UserRecord;

/// Errors loading a users file.
#[derive(Error, Debug)]
pub enum UsersFileError {
    /// The file could not be read.
    #[error("failed to read users file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid users document.
    #[error("invalid users file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A record failed validation or duplicates another.
    #[error("invalid user entry: {0}")]
    Entry(#[from] SecurityError),
}

#[derive(Debug, Deserialize)]
struct UsersDocument {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// Parse a users document from YAML text.
pub fn parse_users(text: &str) -> Result<InMemoryUserStore, UsersFileError> {
    let doc: UsersDocument = serde_yaml::from_str(text)?;
    Ok(InMemoryUserStore::from_records(doc.users)?)
}

/// Read and parse a users file.
pub fn load_users_file(path: &Path) -> Result<InMemoryUserStore, UsersFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| UsersFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let store = parse_users(&text)?;
    tracing::info!(path = %path.display(), users = store.len(), "loaded users file");
    Ok(store)
}
