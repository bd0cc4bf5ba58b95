//! # Digest & Secret Subcommands
//!
//! `hash` prints the stored-credential digest of a password. `secret`
//! prints a fresh random signing secret from the OS RNG.

use anyhow::{bail, Context, Result};
use clap::Args;
use rand_core::{OsRng, RngCore};
use turnstile_auth::{hex_encode, PasswordVerifier, Sha256PasswordVerifier};

/// Arguments for `turnstile hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Password to hash. Read from stdin when omitted.
    #[arg(value_name = "PASSWORD")]
    pub password: Option<String>,
}

/// Arguments for `turnstile secret`.
#[derive(Args, Debug)]
pub struct SecretArgs {
    /// Number of random bytes. Printed as twice as many hex characters.
    #[arg(long, default_value_t = 32)]
    pub bytes: usize,
}

pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => crate::read_stdin_line().context("failed to read password from stdin")?,
    };
    println!("{}", Sha256PasswordVerifier.hash(&password));
    Ok(0)
}

pub fn run_secret(args: &SecretArgs) -> Result<u8> {
    println!("{}", generate_secret(args.bytes)?);
    Ok(0)
}

/// Hex-encoded random secret of `bytes` bytes.
pub fn generate_secret(bytes: usize) -> Result<String> {
    if bytes < 16 {
        bail!("secret must be at least 16 bytes, got {bytes}");
    }
    let mut buf = vec![0u8; bytes];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| anyhow::anyhow!("OS random number generator failed: {e}"))?;
    Ok(hex_encode(&buf))
}
