//! TOML-based configuration for Warden
//!
//! Infrastructure settings live in `warden.toml`. Secrets never do: the file
//! names the environment variables that hold them, and those are resolved
//! once at startup.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [auth]
//! jwt_secret_env = "JWT_SECRET"
//!
//! [database]
//! url = "./data/warden.db"
//! ```

use crate::db::DatabaseProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Root configuration structure loaded from warden.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Origins allowed to make credentialed cross-site requests. Empty
    /// disables CORS handling.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_origins: Vec::new(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Marks the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            cookie_secure: false,
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/warden.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Secret in '{name}' is {len} bytes; at least {} are required", MIN_SECRET_BYTES)]
    WeakSecret { name: String, len: usize },
}

impl FromStr for WardenConfig {
    type Err = ConfigError;

    /// Parses without validating; environment lookups happen in [`WardenConfig::validate`].
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

impl WardenConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file without checking env vars
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Validate values and the availability of referenced env vars
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        self.jwt_secret()?;

        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }
        self.database_provider()?;

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the JWT secret from the environment, rejecting short secrets
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        let name = &self.auth.jwt_secret_env;
        let secret = self
            .resolve_env(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.clone()))?;

        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                name: name.clone(),
                len: secret.len(),
            });
        }

        Ok(secret)
    }

    /// Selects the database backend: Turso when both of its env vars are
    /// configured, the local url otherwise. Turso settings in a build without
    /// the `turso` feature are an error.
    pub fn database_provider(&self) -> Result<DatabaseProvider, ConfigError> {
        #[cfg(not(feature = "turso"))]
        if self.database.turso_url_env.is_some() || self.database.turso_token_env.is_some() {
            return Err(ConfigError::ValidationError(
                "database.turso_url_env/turso_token_env require the `turso` feature".to_string(),
            ));
        }

        #[cfg(feature = "turso")]
        if let (Some(url_env), Some(token_env)) = (
            self.database.turso_url_env.as_ref(),
            self.database.turso_token_env.as_ref(),
        ) {
            let url = self
                .resolve_env(url_env)
                .ok_or_else(|| ConfigError::MissingEnvVar(url_env.clone()))?;
            let auth_token = self
                .resolve_env(token_env)
                .ok_or_else(|| ConfigError::MissingEnvVar(token_env.clone()))?;
            return Ok(DatabaseProvider::Turso { url, auth_token });
        }

        Ok(DatabaseProvider::from_url(&self.database.url))
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
