//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Registration, login, logout and current-user handlers.
pub mod auth;
/// Liveness endpoint.
pub mod health;
/// Read-only role catalog handlers.
pub mod roles;
/// User administration handlers.
pub mod users;
