//! User domain types.

use rolodex_core::{UserId, Username};

/// A site account.
///
/// Carries the stored password hash for verification; deliberately not
/// `Serialize` so the hash can never leak into a rendered response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Login name, unique across all users.
    pub username: Username,
    /// Argon2 PHC string (salt and digest embedded).
    pub password_hash: String,
}

/// Fields for creating a user; the password is hashed separately.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
}
