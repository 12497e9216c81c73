//! Registration, login and identity lookup.
//!
//! The service owns no transport concerns: handlers turn its
//! [`AuthResponse`] into a cookie plus JSON body.

use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{verify_dummy, verify_password, MIN_PASSWORD_LENGTH};
use crate::types::{
    AppError, AuthResponse, Claims, FieldErrors, LoginRequest, NewUser, RegisterRequest, Result,
    User,
};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    issuer: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(credentials: CredentialStore, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            credentials,
            issuer,
        }
    }

    pub fn issuer(&self) -> &Arc<TokenIssuer> {
        &self.issuer
    }

    /// Creates an active `user`-role account and signs it in.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let mut fields = FieldErrors::new();
        if request.email.trim().is_empty() {
            fields.insert("email".to_string(), "Email is required".to_string());
        }
        if let Some(message) = password_strength_error(&request.password) {
            fields.insert("password".to_string(), message.to_string());
        }
        if !fields.is_empty() {
            return Err(AppError::Validation(fields));
        }

        let user = self
            .credentials
            .create(NewUser {
                email: request.email,
                password: request.password,
                first_name: request.first_name,
                last_name: request.last_name,
                role: None,
                active: Some(true),
            })
            .await?;

        tracing::info!(user_id = user.id, email = %user.email, "User registered");

        self.sign_in(user)
    }

    /// Checks credentials and issues a fresh token.
    ///
    /// Unknown email and wrong password fail with the same message; the
    /// deactivated check only happens once the password is known to match.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let mut fields = FieldErrors::new();
        if request.email.trim().is_empty() {
            fields.insert("email".to_string(), "Email is required".to_string());
        }
        if request.password.is_empty() {
            fields.insert("password".to_string(), "Password is required".to_string());
        }
        if !fields.is_empty() {
            return Err(AppError::Validation(fields));
        }

        let user = match self.credentials.find_by_email(&request.email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                verify_dummy(&request.password);
                tracing::info!("Login failed: unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e),
        };

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        if !user.active {
            tracing::info!(user_id = user.id, "Login refused: account deactivated");
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        tracing::info!(user_id = user.id, "User logged in");

        self.sign_in(user)
    }

    /// Resolves the caller's current record; soft-deleted users are gone.
    pub async fn me(&self, claims: &Claims) -> Result<User> {
        self.credentials.find_by_id(claims.user_id).await
    }

    fn sign_in(&self, user: User) -> Result<AuthResponse> {
        let token = self.issuer.issue(&user)?;
        Ok(AuthResponse { token, user })
    }
}

/// Returns the validation message for a password that is too short.
pub fn password_strength_error(password: &str) -> Option<&'static str> {
    (password.chars().count() < MIN_PASSWORD_LENGTH)
        .then_some("Password must be at least 8 characters")
}
