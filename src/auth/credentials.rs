//! Credential store: the write boundary for user records.
//!
//! Every create and update passes its password through
//! [`HashedPassword::seal`] exactly once before the repository sees it.
//! Emails are trimmed and lowercased here so lookups and the unique
//! constraint agree.

use crate::auth::password::HashedPassword;
use crate::db::{NewUserRecord, UserChanges, UserRepository};
use crate::types::{AppError, NewUser, Result, Role, User, UserFilter, UserUpdate};
use std::sync::Arc;

#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn UserRepository>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates a user, applying role `user` and `active = true` when unset.
    ///
    /// Fails with `Conflict` when the email is taken.
    pub async fn create(&self, candidate: NewUser) -> Result<User> {
        let email = normalize_email(&candidate.email);

        if self.repo.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let record = NewUserRecord {
            email,
            password_hash: HashedPassword::seal(&candidate.password)?,
            first_name: candidate.first_name.trim().to_string(),
            last_name: candidate.last_name.trim().to_string(),
            role: candidate.role.unwrap_or_default(),
            active: candidate.active.unwrap_or(true),
        };

        self.repo.insert_user(&record).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        self.repo
            .get_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User> {
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Applies a partial update. An empty password string leaves the stored
    /// hash untouched.
    pub async fn update(&self, id: i64, partial: UserUpdate) -> Result<User> {
        let password_hash = match partial.password.as_deref() {
            Some(raw) if !raw.is_empty() => Some(HashedPassword::seal(raw)?),
            _ => None,
        };

        let changes = UserChanges {
            email: partial.email.as_deref().map(normalize_email),
            password_hash,
            first_name: partial.first_name.map(|s| s.trim().to_string()),
            last_name: partial.last_name.map(|s| s.trim().to_string()),
            role: partial.role,
            active: partial.active,
        };

        self.repo
            .update_user(id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Soft-deletes a user; the row stays for referential history.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.repo.soft_delete_user(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("User not found".to_string()))
        }
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<(Vec<User>, i64)> {
        self.repo.list_users(filter).await
    }

    /// True when some user other than `except_id` already holds `email`.
    pub async fn email_in_use(&self, email: &str, except_id: Option<i64>) -> Result<bool> {
        self.repo
            .email_in_use(&normalize_email(email), except_id)
            .await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.repo.list_roles().await
    }

    pub async fn find_role(&self, id: i64) -> Result<Role> {
        self.repo
            .get_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_string()))
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
