//! # User Accounts
//!
//! In-memory user registry with argon2 password hashes. There is no
//! database in this deployment; accounts last for the process lifetime,
//! which matches the session-scoped carts they go with. Checkout only
//! needs the username for the payment receipt.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Username and password must not be empty")]
    EmptyField,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::UsernameTaken => 409,
            AuthError::InvalidCredentials => 401,
            AuthError::PasswordMismatch => 400,
            AuthError::EmptyField => 400,
            AuthError::Internal(_) => 500,
        }
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("Invalid hash format: {e}")))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Process-lifetime user registry: username → argon2 hash.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, String>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user. `confirm` must match `password`.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyField);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let hash = hash_password(password)?;

        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(AuthError::UsernameTaken);
        }
        users.insert(username.to_string(), hash);
        Ok(())
    }

    /// Check credentials, returning the username on success.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let users = self.users.read().await;
        let hash = users
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?
            .clone();
        drop(users);

        if verify_password(password, &hash)? {
            Ok(username.to_string())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
