//! Shared fixtures for integration tests.

#![allow(dead_code)]

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use std::sync::Arc;
use warden::{
    auth::middleware::AUTH_COOKIE_NAME,
    types::{NewUser, User, UserRole},
    AppState, TursoClient, WardenConfig,
};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "password123";

/// State over a fresh in-memory database.
pub async fn test_state() -> AppState {
    let db = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");
    AppState::new(WardenConfig::default(), Arc::new(db), TEST_SECRET)
}

pub async fn test_server() -> (TestServer, AppState) {
    let state = test_state().await;
    let server = TestServer::new(warden::build_app(state.clone())).expect("test server");
    (server, state)
}

/// Inserts a user straight through the credential store.
pub async fn seed_user(state: &AppState, email: &str, role: UserRole, active: bool) -> User {
    state
        .credentials
        .create(NewUser {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Some(role),
            active: Some(active),
        })
        .await
        .expect("seed user")
}

/// A freshly signed token for `user`.
pub fn token_for(state: &AppState, user: &User) -> String {
    state.token_issuer.issue(user).expect("issue token")
}

/// `Cookie` request header carrying the session token.
pub fn session_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::COOKIE,
        HeaderValue::from_str(&format!("{}={}", AUTH_COOKIE_NAME, token)).expect("header value"),
    )
}
