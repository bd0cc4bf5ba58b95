//! # turnstile-core — Foundational Types for Turnstile
//!
//! - [`UserRecord`] and [`UserRole`]: the credential-bearing record owned by
//!   the user store.
//! - [`UserLookup`]: the lookup-by-username capability the authentication
//!   core consumes, with [`InMemoryUserStore`] as the bundled implementation.
//! - [`SecurityError`]: the closed error taxonomy surfaced to callers.
//!
//! This crate does no hashing and issues no tokens; see `turnstile-auth`.

pub mod error;
pub mod lookup;
pub mod user;
pub mod users_file;

pub use error::{LookupError, SecurityError};
pub use lookup::{InMemoryUserStore, UserLookup};
pub use user::{UserRecord, UserRole, DEFAULT_EMAIL};
pub use users_file::{load_users_file, parse_users, UsersFileError};
