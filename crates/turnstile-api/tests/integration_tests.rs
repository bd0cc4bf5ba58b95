//! # Integration Tests for turnstile-api
//!
//! Drives the full router: login, the authentication gate, whitelisting,
//! role checks, token expiry, and the vnd.error body of every rejection.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use turnstile_api::access::RoleRule;
use turnstile_api::config::SecurityConfig;
use turnstile_api::error::VND_ERROR;
use turnstile_api::state::AppState;
use turnstile_api::whitelist::Whitelist;
use turnstile_auth::{FixedClock, PasswordVerifier, Sha256PasswordVerifier};
use turnstile_core::{InMemoryUserStore, LookupError, UserLookup, UserRecord};

const SECRET: &str = "integration-test-secret";

struct TestApp {
    store: InMemoryUserStore,
    clock: Arc<FixedClock>,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_secret(SECRET)
    }

    fn with_secret(secret: &str) -> Self {
        Self::with_config(SecurityConfig::new(secret).with_token_ttl(Duration::hours(1)))
    }

    fn with_config(config: SecurityConfig) -> Self {
        let digest = |raw: &str| Sha256PasswordVerifier.hash(raw);
        let store = InMemoryUserStore::from_records([
            UserRecord::regular("alice", digest("secret"), "Alice", "Liddell")
                .unwrap()
                .with_email("alice@wonderland.test"),
            UserRecord::administrator("root", digest("toor"), "Gabriele", "Giunchi").unwrap(),
        ])
        .unwrap();
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let state = AppState::with_clock(&config, Arc::new(store.clone()), clock.clone()).unwrap();
        Self {
            store,
            clock,
            state,
        }
    }

    fn router(&self) -> axum::Router {
        turnstile_api::app(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> axum::http::Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let response = self.send(login_request(username, password)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn token_check(raw: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/login/token")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(raw.to_string()))
        .unwrap()
}

async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Assert a vnd.error response and return its body.
async fn assert_vnd_error(
    response: axum::http::Response<Body>,
    status: StatusCode,
    title: &str,
) -> serde_json::Value {
    assert_eq!(response.status(), status);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        VND_ERROR
    );
    let body = body_json(response).await;
    assert_eq!(body["message"], title);
    assert!(body["logref"].is_string());
    body
}

// -- Login --------------------------------------------------------------------

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let app = TestApp::new();
    let response = app.send(login_request("alice", "secret")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_bad_credentials() {
    let app = TestApp::new();
    let response = app.send(login_request("alice", "wrong")).await;
    let body = assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;
    assert_eq!(body["logref"], "Invalid username/password supplied");
}

#[tokio::test]
async fn login_with_unknown_user_looks_like_wrong_password() {
    let app = TestApp::new();
    let unknown = body_json(app.send(login_request("mario", "djksnkan")).await).await;
    let wrong = body_json(app.send(login_request("alice", "mmkldamaldmak")).await).await;
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn login_with_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    assert_vnd_error(app.send(request).await, StatusCode::BAD_REQUEST, "Bad Request").await;
}

#[tokio::test]
async fn login_with_blank_username_is_illegal_argument() {
    let app = TestApp::new();
    let response = app.send(login_request("  ", "secret")).await;
    assert_vnd_error(response, StatusCode::BAD_REQUEST, "Illegal arguments").await;
}

// -- Gate ---------------------------------------------------------------------

#[tokio::test]
async fn protected_endpoint_accepts_issued_token() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    let response = app.send(get("/api/v1/alive/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@wonderland.test");
    assert_eq!(body["roles"], serde_json::json!(["USER"]));
    assert!(body.get("password_digest").is_none());
}

#[tokio::test]
async fn protected_endpoint_without_header_is_unauthorized() {
    let app = TestApp::new();
    let response = app.send(get("/api/v1/alive/me", None)).await;
    assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/v1/alive/me")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0")
        .body(Body::empty())
        .unwrap();
    let body = assert_vnd_error(app.send(request).await, StatusCode::UNAUTHORIZED, "Bad credentials").await;
    assert!(body["logref"].as_str().unwrap().contains("Bearer"));
}

#[tokio::test]
async fn whitelisted_endpoint_needs_no_token() {
    let app = TestApp::new();
    let response = app.send(get("/api/v1/alive", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Everything's fine");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn whitelisted_endpoint_ignores_invalid_token() {
    let app = TestApp::new();
    let response = app.send(get("/api/v1/alive", Some("dajdjadjasdnaj"))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let other = TestApp::with_secret("some-other-secret");
    let foreign = other.login("alice", "secret").await;

    let app = TestApp::new();
    let response = app.send(get("/api/v1/alive/me", Some(&foreign))).await;
    assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;

    app.clock.advance(Duration::minutes(59));
    let response = app.send(get("/api/v1/alive/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(1));
    let response = app.send(get("/api/v1/alive/me", Some(&token))).await;
    let body = assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;
    assert_eq!(body["logref"], "token expired");
}

#[tokio::test]
async fn deleted_user_token_is_rejected() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    app.store.remove("alice").unwrap();
    let response = app.send(get("/api/v1/alive/me", Some(&token))).await;
    assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;
}

// -- Access decision ------------------------------------------------------------

#[tokio::test]
async fn secret_endpoint_forbidden_for_regular_user() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    let response = app.send(get("/api/v1/alive/secret", Some(&token))).await;
    assert_vnd_error(response, StatusCode::FORBIDDEN, "Forbidden").await;
}

#[tokio::test]
async fn secret_endpoint_allowed_for_administrator() {
    let app = TestApp::new();
    let token = app.login("root", "toor").await;
    let response = app.send(get("/api/v1/alive/secret", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("administrators only"));
}

#[tokio::test]
async fn role_change_applies_to_existing_token() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    app.store
        .set_roles("alice", ["ADMINISTRATOR".to_string()])
        .unwrap();
    let response = app.send(get("/api/v1/alive/secret", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn am_i_admin_reports_role() {
    let app = TestApp::new();
    let user = app.login("alice", "secret").await;
    let admin = app.login("root", "toor").await;

    let response = app.send(get("/api/v1/alive/me/am_I_admin", Some(&user))).await;
    assert_eq!(body_json(response).await, serde_json::json!(false));

    let response = app.send(get("/api/v1/alive/me/am_I_admin", Some(&admin))).await;
    assert_eq!(body_json(response).await, serde_json::json!(true));
}

// -- Custom settings ----------------------------------------------------------

#[tokio::test]
async fn custom_whitelist_protects_alive() {
    let config = SecurityConfig::new(SECRET)
        .with_whitelist(Whitelist::new(["/api/v1/login", "/api/v1/login/token"]));
    let app = TestApp::with_config(config);

    let response = app.send(get("/api/v1/alive", None)).await;
    assert_vnd_error(response, StatusCode::UNAUTHORIZED, "Bad credentials").await;

    let token = app.login("alice", "secret").await;
    let response = app.send(get("/api/v1/alive", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn custom_role_rules_replace_defaults() {
    let config = SecurityConfig::new(SECRET)
        .with_role_rules(vec![RoleRule::new("/api/v1/alive/me/**", "ADMINISTRATOR")]);
    let app = TestApp::with_config(config);
    let user = app.login("alice", "secret").await;
    let admin = app.login("root", "toor").await;

    let response = app.send(get("/api/v1/alive/me", Some(&user))).await;
    assert_vnd_error(response, StatusCode::FORBIDDEN, "Forbidden").await;
    let response = app.send(get("/api/v1/alive/me/am_I_admin", Some(&admin))).await;
    assert_eq!(body_json(response).await, serde_json::json!(true));

    // The default admin rule on /secret no longer applies.
    let response = app.send(get("/api/v1/alive/secret", Some(&user))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Token check ------------------------------------------------------------------

#[tokio::test]
async fn token_check_true_for_fresh_token() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    let response = app.send(token_check(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(true));
}

#[tokio::test]
async fn token_check_false_for_garbage() {
    let app = TestApp::new();
    let response = app.send(token_check("dajdjadjasdnaj")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(false));
}

#[tokio::test]
async fn token_check_false_after_expiry() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;
    app.clock.advance(Duration::hours(2));
    let response = app.send(token_check(&token)).await;
    assert_eq!(body_json(response).await, serde_json::json!(false));
}

// -- Store failure ----------------------------------------------------------------

struct UnavailableStore;

#[async_trait::async_trait]
impl UserLookup for UnavailableStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, LookupError> {
        Err(LookupError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn store_failure_during_login_is_internal_error() {
    let state = AppState::new(&SecurityConfig::new(SECRET), Arc::new(UnavailableStore)).unwrap();
    let response = turnstile_api::app(state)
        .oneshot(login_request("alice", "secret"))
        .await
        .unwrap();
    let body = assert_vnd_error(response, StatusCode::INTERNAL_SERVER_ERROR, "Internal Error").await;
    assert!(!body["logref"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn store_failure_during_gate_invokes_no_handler() {
    let app = TestApp::new();
    let token = app.login("alice", "secret").await;

    let config = SecurityConfig::new(SECRET).with_token_ttl(Duration::hours(1));
    let broken = AppState::with_clock(&config, Arc::new(UnavailableStore), app.clock.clone()).unwrap();
    let response = turnstile_api::app(broken)
        .oneshot(get("/api/v1/alive/me", Some(&token)))
        .await
        .unwrap();
    assert_vnd_error(response, StatusCode::INTERNAL_SERVER_ERROR, "Internal Error").await;
}
