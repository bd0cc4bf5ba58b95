//! # Alive API
//!
//! `GET /api/v1/alive` is a whitelisted liveness check. The other routes
//! report on the authenticated caller; `/secret` is reserved for
//! administrators by the default role rules.

use std::collections::BTreeSet;

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::state::AppState;

pub const SECRET_NOTICE: &str =
    "This endpoint is for administrators only. If you are not this is a problem";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliveResponse {
    pub message: String,
    pub version: String,
}

/// The caller's user record without the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub roles: BTreeSet<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/alive", get(alive))
        .route("/api/v1/alive/me", get(who_am_i))
        .route("/api/v1/alive/me/am_I_admin", get(am_i_admin))
        .route("/api/v1/alive/secret", get(secret))
}

async fn alive() -> Json<AliveResponse> {
    Json(AliveResponse {
        message: "Everything's fine".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn who_am_i(CurrentUser(principal): CurrentUser) -> Json<UserView> {
    let record = principal.record();
    Json(UserView {
        username: principal.username().to_string(),
        name: record.name.clone(),
        surname: record.surname.clone(),
        email: record.email.clone(),
        roles: principal.roles().clone(),
    })
}

async fn am_i_admin(CurrentUser(principal): CurrentUser) -> Json<bool> {
    Json(principal.is_admin())
}

async fn secret(CurrentUser(_): CurrentUser) -> &'static str {
    SECRET_NOTICE
}
