//! # Token Subcommand
//!
//! Issue and verify bearer tokens offline, against the same users file and
//! signing secret the API server is configured with. A token issued here is
//! accepted by the server and vice versa.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use turnstile_auth::{
    ttl_from_secs, AuthError, CredentialAuthenticator, Sha256PasswordVerifier, Token, TokenService,
};
use turnstile_core::{load_users_file, InMemoryUserStore};

/// Arguments for `turnstile token`.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Authenticate a user and print a signed token.
    Issue {
        /// YAML users file.
        #[arg(long, env = "TURNSTILE_USERS_FILE")]
        users_file: PathBuf,
        #[arg(long)]
        username: String,
        /// Password. Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Token signing secret.
        #[arg(long, env = "TURNSTILE_TOKEN_SECRET", hide_env_values = true)]
        secret: String,
        /// Token lifetime in seconds.
        #[arg(long, env = "TURNSTILE_TOKEN_TTL_SECS", default_value_t = 86_400)]
        ttl_secs: i64,
    },

    /// Check a token and print the user it belongs to.
    Verify {
        /// YAML users file.
        #[arg(long, env = "TURNSTILE_USERS_FILE")]
        users_file: PathBuf,
        /// Token signing secret.
        #[arg(long, env = "TURNSTILE_TOKEN_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

/// Execute the token subcommand.
pub fn run_token(args: &TokenArgs) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match &args.command {
        TokenCommand::Issue {
            users_file,
            username,
            password,
            secret,
            ttl_secs,
        } => {
            let password = match password {
                Some(p) => p.clone(),
                None => crate::read_stdin_line().context("failed to read password from stdin")?,
            };
            let ttl = ttl_from_secs(*ttl_secs).context("invalid --ttl-secs")?;
            let store = load_store(users_file)?;
            let token = runtime.block_on(issue_token(
                store,
                secret.as_bytes(),
                ttl,
                username,
                &password,
            ))?;
            tracing::info!(%username, expires_at = %token.expires_at(), "token issued");
            println!("{}", token.as_str());
            Ok(0)
        }
        TokenCommand::Verify {
            users_file,
            secret,
            token,
        } => {
            let store = load_store(users_file)?;
            let service = token_service(store, secret.as_bytes(), chrono::Duration::seconds(1))?;
            match runtime.block_on(service.validate(token.trim())) {
                Ok(principal) => {
                    let roles: Vec<&str> = principal.roles().iter().map(String::as_str).collect();
                    println!(
                        "OK: token is valid for '{}' (roles: {})",
                        principal.username(),
                        roles.join(", ")
                    );
                    Ok(0)
                }
                Err(AuthError::Security(reason)) => {
                    println!("FAIL: {reason}");
                    Ok(1)
                }
                Err(other) => Err(other.into()),
            }
        }
    }
}

fn load_store(path: &Path) -> Result<InMemoryUserStore> {
    load_users_file(path).with_context(|| format!("failed to load users from {}", path.display()))
}

fn token_service(
    store: InMemoryUserStore,
    secret: &[u8],
    ttl: chrono::Duration,
) -> Result<TokenService> {
    TokenService::new(secret, ttl, Arc::new(store)).context("invalid token settings")
}

/// Authenticate `username` against `store` and issue a token.
pub async fn issue_token(
    store: InMemoryUserStore,
    secret: &[u8],
    ttl: chrono::Duration,
    username: &str,
    password: &str,
) -> Result<Token> {
    let service = token_service(store.clone(), secret, ttl)?;
    let authenticator =
        CredentialAuthenticator::new(Arc::new(store), Arc::new(Sha256PasswordVerifier));
    let principal = authenticator
        .authenticate(username, password)
        .await
        .with_context(|| format!("login failed for '{username}'"))?;
    let token = service
        .issue(&principal)
        .map_err(|e| anyhow::anyhow!("failed to sign token: {e}"))?;
    Ok(token)
}
