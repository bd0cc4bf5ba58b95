//! # Password Digests
//!
//! A stored credential is the lowercase hex SHA-256 of the password. There
//! is no per-user salt: the stored record *is* the digest, which keeps the
//! stored-credential format of existing user stores. An unsalted single pass
//! is weak against precomputed tables; replacing [`Sha256PasswordVerifier`]
//! with a salted or memory-hard scheme changes the stored format and
//! requires re-hashing every record.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// One-way password hashing and comparison.
///
/// `matches(raw, digest)` must equal `hash(raw) == digest`.
pub trait PasswordVerifier: Send + Sync {
    /// Hash a raw password into its stored digest.
    fn hash(&self, raw: &str) -> String;

    /// Whether `raw` hashes to `digest`.
    fn matches(&self, raw: &str, digest: &str) -> bool {
        constant_time_str_eq(&self.hash(raw), digest)
    }
}

/// SHA-256, lowercase hex, 64 characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordVerifier;

impl PasswordVerifier for Sha256PasswordVerifier {
    fn hash(&self, raw: &str) -> String {
        hex_encode(&Sha256::digest(raw.as_bytes()))
    }
}

/// Lowercase hex encoding, two characters per byte.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-time string comparison.
///
/// When lengths differ, a dummy comparison keeps timing independent of
/// where the mismatch is.
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        let _ = a.ct_eq(a);
        return false;
    }
    a.ct_eq(b).into()
}
