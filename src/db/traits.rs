//! Database abstraction traits
//!
//! This module provides the `UserRepository` trait that abstracts over the
//! relational backends (in-memory SQLite, file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use warden::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/warden.db".into() }.create_client().await?;
//! ```

use crate::auth::password::HashedPassword;
use crate::types::{Result, Role, User, UserFilter, UserRole};
use async_trait::async_trait;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<super::turso::TursoClient> {
        match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }

    /// Picks a provider from a configured url: `:memory:` or empty means memory.
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }
}

/// Row ready for insertion; the password is already sealed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password_hash: HashedPassword,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub active: bool,
}

/// Column changes for an update; the password, if any, is already sealed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<HashedPassword>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// Persistence operations for users and the role catalog.
///
/// Soft-deleted users are invisible to every read. A duplicate email on
/// insert or update surfaces as `AppError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    // ============== User Operations ==============

    /// Insert a user and return the stored record
    async fn insert_user(&self, record: &NewUserRecord) -> Result<User>;

    /// Get a user by (normalized) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Whether any row other than `except_id` holds `email`, soft-deleted
    /// rows included, since the unique constraint covers them too
    async fn email_in_use(&self, email: &str, except_id: Option<i64>) -> Result<bool>;

    /// Apply changes; `None` when the user does not exist
    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>>;

    /// Mark a user deleted; `false` when there was nothing to delete
    async fn soft_delete_user(&self, id: i64) -> Result<bool>;

    /// Page through users, newest first, with the total match count
    async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, i64)>;

    // ============== Role Operations ==============

    async fn list_roles(&self) -> Result<Vec<Role>>;

    async fn get_role(&self, id: i64) -> Result<Option<Role>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_url() {
        assert_eq!(DatabaseProvider::from_url(":memory:"), DatabaseProvider::Memory);
        assert_eq!(DatabaseProvider::from_url(""), DatabaseProvider::Memory);
        assert_eq!(
            DatabaseProvider::from_url("./data/warden.db"),
            DatabaseProvider::SQLite {
                path: "./data/warden.db".to_string()
            }
        );
    }
}
