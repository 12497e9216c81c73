//! Configuration utilities.

/// `warden.toml` loading and validation.
pub mod toml_config;
