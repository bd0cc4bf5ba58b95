//! # turnstile-api — Axum API Surface for Turnstile
//!
//! ## API Surface
//!
//! | Route                          | Access              |
//! |--------------------------------|---------------------|
//! | `POST /api/v1/login`           | whitelisted         |
//! | `POST /api/v1/login/token`     | whitelisted         |
//! | `GET  /api/v1/alive`           | whitelisted         |
//! | `GET  /api/v1/alive/me`        | authenticated       |
//! | `GET  /api/v1/alive/me/am_I_admin` | authenticated   |
//! | `GET  /api/v1/alive/secret`    | `ADMINISTRATOR`     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware (gate + access decision) → Handler
//! ```

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod whitelist;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::login::router())
        .merge(routes::alive::router())
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
