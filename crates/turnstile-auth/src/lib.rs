//! # turnstile-auth — Authentication Primitives
//!
//! - [`PasswordVerifier`]: one-way digest of a raw password, with
//!   [`Sha256PasswordVerifier`] as the stored-credential scheme.
//! - [`CredentialAuthenticator`]: username/password to [`Principal`].
//! - [`TokenService`]: issue and validate signed, expiring bearer tokens.
//!
//! Nothing here knows about HTTP. The API crate wires these into request
//! handling and maps [`AuthError`] onto responses.

pub mod clock;
pub mod credentials;
pub mod error;
pub mod password;
pub mod principal;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credentials::CredentialAuthenticator;
pub use error::{AuthError, TokenError};
pub use password::{hex_encode, PasswordVerifier, Sha256PasswordVerifier};
pub use principal::Principal;
pub use token::{ttl_from_secs, Claims, Token, TokenService, MAX_TOKEN_TTL_SECS};
