//! # Warden
//!
//! User registration, login and cookie-backed JWT sessions with role-based
//! user administration, served over axum and stored in SQLite via libsql.
//!
//! ## Overview
//!
//! Warden can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `warden-server` binary
//! 2. **As a library** - Mount [`build_app`] (or [`api::routes::create_router`])
//!    inside your own axum application
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden::{build_app, AppState, TursoClient, WardenConfig};
//!
//! let config = WardenConfig::load("warden.toml")?;
//! let secret = config.jwt_secret()?;
//! let db = config.database_provider()?.create_client().await?;
//!
//! let app = build_app(AppState::new(config, Arc::new(db), &secret));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, tokens, session middleware and policy
//! - [`cli`] - Command-line interface of the binary
//! - [`db`] - Database abstraction (SQLite, Turso)
//! - [`types`] - Domain types, request/response bodies and errors
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication, sessions and authorization.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Database clients (SQLite/Turso).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::credentials::CredentialStore;
pub use auth::jwt::TokenIssuer;
pub use auth::service::AuthService;
pub use db::{DatabaseProvider, TursoClient, UserRepository};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, WardenConfig};

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based infrastructure configuration, fixed for the process lifetime
    pub config: Arc<WardenConfig>,
    /// User persistence with hashing at the write boundary
    pub credentials: CredentialStore,
    /// Registration and login workflows
    pub auth_service: Arc<AuthService>,
    /// Session token signer; its key never changes after startup
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(config: WardenConfig, repo: Arc<dyn UserRepository>, jwt_secret: &str) -> Self {
        let token_issuer = Arc::new(TokenIssuer::new(jwt_secret));
        let credentials = CredentialStore::new(repo);
        let auth_service = Arc::new(AuthService::new(
            credentials.clone(),
            token_issuer.clone(),
        ));

        Self {
            config: Arc::new(config),
            credentials,
            auth_service,
            token_issuer,
        }
    }
}

/// Assembles the full application: `/health`, the API under `/api`, request
/// tracing, body limits and, when origins are configured, credentialed CORS.
pub fn build_app(state: AppState) -> Router {
    #[allow(unused_mut)]
    let mut app = Router::new()
        .route("/health", get(api::handlers::health::health))
        .nest(
            "/api",
            api::routes::create_router(state.token_issuer.clone()),
        );

    #[cfg(feature = "swagger-ui")]
    {
        use utoipa::OpenApi;
        app = app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::routes::ApiDoc::openapi()),
        );
    }

    let mut app = app
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.server.cors_origins) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    // Cookies cross origins only with credentials and an explicit origin list.
    Some(
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}
