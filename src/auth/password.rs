//! Password hashing with Argon2id.
//!
//! Everything that reaches the users table goes through [`HashedPassword`],
//! which can only be built by hashing a plaintext value or by accepting a
//! string that is already a PHC-encoded Argon2 hash.

use crate::types::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt;
use std::sync::LazyLock;

/// Encoding prefix shared by every Argon2 PHC string.
const HASH_PREFIX: &str = "$argon2";

/// Minimum accepted plaintext length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Verified against when the email is unknown, so both login failures cost one hash.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("warden-timing-equalizer").unwrap_or_default());

/// A password value that is safe to persist.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hashes `raw` unless it already carries the Argon2 encoding prefix.
    ///
    /// This is the single hashing step of the write path: create and update
    /// both call it before anything is handed to the store.
    pub fn seal(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(AppError::field("password", "Password is required"));
        }
        if is_password_hash(raw) {
            return Ok(Self(raw.to_string()));
        }
        hash_password(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(..)")
    }
}

/// True when `value` is a well-formed Argon2 PHC string.
pub fn is_password_hash(value: &str) -> bool {
    value.starts_with(HASH_PREFIX) && PasswordHash::new(value).is_ok()
}

/// Hashes a password using Argon2id with a random salt.
///
/// Returns a PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Burns one verification against a fixed hash; the outcome is ignored.
pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}
