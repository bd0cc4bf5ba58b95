//! Tracing subscriber setup for the API binary.
//!
//! Filter comes from `RUST_LOG` (default `info`). Set
//! `TURNSTILE_LOG_FORMAT=json` for one JSON object per event.

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "TURNSTILE_LOG_FORMAT";

/// Install the global subscriber. Call once, first thing in `main`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
