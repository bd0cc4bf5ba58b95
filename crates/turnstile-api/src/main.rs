//! # turnstile-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment;
//! see [`turnstile_api::config`].

use std::sync::Arc;

use turnstile_api::config::AppConfig;
use turnstile_api::state::AppState;
use turnstile_core::{load_users_file, InMemoryUserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    turnstile_api::telemetry::init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;
    tracing::info!(?config, "configuration loaded");

    let store = match &config.users_file {
        Some(path) => load_users_file(path)?,
        None => {
            tracing::warn!("no users file configured; the user store is empty");
            InMemoryUserStore::new()
        }
    };

    let state = AppState::new(&config.security, Arc::new(store))?;
    let app = turnstile_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Turnstile API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
