//! # turnstile-cli — Operator Tooling for Turnstile
//!
//! Provides the `turnstile` command-line interface.
//!
//! ## Subcommands
//!
//! - `turnstile hash`: SHA-256 digest of a password, for users files.
//! - `turnstile secret`: random token signing secret.
//! - `turnstile token issue`: log in against a users file and print a token.
//! - `turnstile token verify`: check a token against a users file.
//!
//! ```bash
//! turnstile secret > secret.txt
//! export TURNSTILE_TOKEN_SECRET=$(cat secret.txt)
//! turnstile token issue --users-file users.yaml --username alice
//! ```

pub mod digest;
pub mod token;

/// Read one line from stdin with the trailing newline removed.
pub(crate) fn read_stdin_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
