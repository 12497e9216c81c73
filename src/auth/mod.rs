//! Authentication and authorization
//!
//! This module provides the session infrastructure for the Warden API:
//! password sealing, token signing, the cookie-backed session boundary and
//! the per-operation authorization predicate.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and the `HashedPassword` write guard
//! - [`auth::credentials`](crate::auth::credentials) - user persistence with email normalization
//! - [`auth::jwt`](crate::auth::jwt) - HS256 session tokens with a fixed 24h lifetime
//! - [`auth::middleware`](crate::auth::middleware) - Axum layers, cookie helpers and the `AuthUser` extractor
//! - [`auth::service`](crate::auth::service) - register, login and `me`
//! - [`auth::policy`](crate::auth::policy) - who may do what to which user record
//!
//! # Middleware
//!
//! `require_authenticated` validates the `auth_token` cookie (or a bearer
//! header) and injects [`Claims`](crate::types::Claims) into the request
//! extensions:
//!
//! ```ignore
//! use warden::auth::middleware::{require_admin, require_authenticated};
//!
//! let app = Router::new()
//!     .route("/roles", get(list_roles))
//!     .layer(middleware::from_fn(require_admin))
//!     .layer(middleware::from_fn_with_state(issuer, require_authenticated));
//! ```
//!
//! ## Extracting Claims in Handlers
//!
//! ```ignore
//! async fn profile(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.email)
//! }
//! ```
//!
//! Tokens are stateless. Logging out clears the cookie in the browser but a
//! copied token keeps working until it expires.

/// Per-user record persistence with hashing at the write boundary.
pub mod credentials;
/// Session token signing and verification.
pub mod jwt;
/// Authentication middleware, cookie helpers and extractors.
pub mod middleware;
/// Password hashing.
pub mod password;
/// Authorization decisions for user administration.
pub mod policy;
/// Registration and login workflows.
pub mod service;
