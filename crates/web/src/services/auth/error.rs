//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] rolodex_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    ///
    /// One variant for both cases so responses can't be used for
    /// username enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already taken.
    #[error("username already taken")]
    UsernameTaken,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error (malformed stored hash is a programmer error).
    #[error("password hashing error")]
    PasswordHash,
}
