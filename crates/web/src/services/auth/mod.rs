//! Authentication service.
//!
//! Password hashing and account registration/login on top of the user
//! repository.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use rolodex_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration, login, and password checks.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let new_user = NewUser {
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            username,
        };

        let user = self
            .users
            .create(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is
    /// wrong; unknown-user and wrong-password are indistinguishable.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Check a candidate password for a user by ID.
    ///
    /// Returns `false` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn check_password(&self, id: UserId, candidate: &str) -> Result<bool, AuthError> {
        let Some(user) = self.users.get_by_id(id).await? else {
            return Ok(false);
        };

        Ok(verify_password(candidate, &user.password_hash).is_ok())
    }

    /// Create a user if the username is not already present.
    ///
    /// Used for first-run bootstrap and the CLI; returns `Ok(None)` when the
    /// username exists (including when a concurrent create wins the race).
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`], except `UsernameTaken` which is folded
    /// into `Ok(None)`.
    pub async fn ensure_user(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let parsed = Username::parse(username)?;
        if self.users.username_exists(&parsed).await? {
            return Ok(None);
        }

        match self
            .register(first_name, last_name, username, password)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(AuthError::UsernameTaken) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2 and a fresh random salt.
///
/// The returned PHC string embeds the salt and parameters alongside the
/// digest, so verification needs no extra state.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;

    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC string.
///
/// The comparison inside Argon2 is constant-time.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch and
/// `AuthError::PasswordHash` when the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret123").unwrap();
        let second = hash_password("secret123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHash)
        ));
    }

    #[tokio::test]
    async fn test_register_then_check_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let user = auth
            .register("Alice", "Smith", "alice", "secret123")
            .await
            .unwrap();

        assert!(auth.check_password(user.id, "secret123").await.unwrap());
        assert!(!auth.check_password(user.id, "secret124").await.unwrap());
    }

    #[tokio::test]
    async fn test_check_password_missing_user_is_false() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        assert!(!auth
            .check_password(UserId::new(404), "whatever")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_login_success_and_generic_failure() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Alice", "Smith", "alice", "secret123")
            .await
            .unwrap();

        let user = auth.login("alice", "secret123").await.unwrap();
        assert_eq!(user.username.as_str(), "alice");

        // Wrong password and unknown user produce the same error
        assert!(matches!(
            auth.login("alice", "bad-password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "secret123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let result = auth.register("Al", "S", "al", "short").await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.register("Alice", "Smith", "alice", "secret123")
            .await
            .unwrap();
        let result = auth.register("Alicia", "Stone", "alice", "secret456").await;
        assert!(matches!(result, Err(AuthError::UsernameTaken)));
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        let first = auth
            .ensure_user("", "", "seed-user", "bootstrap-pass")
            .await
            .unwrap();
        assert!(first.is_some());

        let second = auth
            .ensure_user("", "", "seed-user", "bootstrap-pass")
            .await
            .unwrap();
        assert!(second.is_none());
    }
}
