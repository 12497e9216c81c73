//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Warden, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//! - [`api::extract`](crate::api::extract) - Extractors that reject with the API error payload
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register and receive a session cookie
//! - `POST /api/auth/login` - Login and receive a session cookie
//! - `POST /api/auth/logout` - Clear the session cookie
//! - `GET /api/auth/me` - Current user
//!
//! ## Users (`/api/users`)
//! - `GET /api/users` - List users (admin)
//! - `POST /api/users` - Create a user (admin)
//! - `GET /api/users/{id}` - Get a user (admin or self)
//! - `PUT /api/users/{id}` - Update a user (admin)
//! - `DELETE /api/users/{id}` - Soft-delete a user (admin, never self)
//!
//! ## Roles (`/api/roles`)
//! - `GET /api/roles`, `GET /api/roles/{id}` - Role catalog (admin)
//!
//! ## Health
//! - `GET /health` - Liveness probe
//!
//! # Authentication
//!
//! Protected endpoints read the `auth_token` cookie. Clients that cannot keep
//! cookies may send the same token as a bearer header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The document is served at `/api/openapi.json`. When the `swagger-ui`
//! feature is enabled, interactive API documentation is available at
//! `/swagger-ui/`.

/// Extractors with API-shaped rejections.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
