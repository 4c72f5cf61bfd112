//! User management commands.
//!
//! # Environment Variables
//!
//! - `ROLODEX_DATABASE_URL` (or `DATABASE_URL`) - SQLite connection string
//! - `ROLODEX_USER_PASSWORD` - Password for `user create`

use thiserror::Error;

use rolodex_web::services::auth::{AuthError, AuthService};

use super::migrate::MigrateError;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Environment or connection problem.
    #[error(transparent)]
    Setup(#[from] MigrateError),

    /// Username is taken.
    #[error("User already exists with username: {0}")]
    UserExists(String),

    /// Registration failed.
    #[error("Registration error: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new application user.
///
/// Fails when the username is already taken so a typo does not silently
/// leave the intended password unset.
pub async fn create(
    username: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), UserError> {
    dotenvy::dotenv().ok();

    let database_url = super::migrate::database_url_from_env()?;

    tracing::info!("Connecting to database...");
    let pool = rolodex_web::db::create_pool(&database_url)
        .await
        .map_err(MigrateError::from)?;

    let auth = AuthService::new(&pool);
    match auth
        .ensure_user(first_name, last_name, username, password)
        .await?
    {
        Some(user) => {
            tracing::info!("User created successfully! ID: {}, Username: {}", user.id, user.username);
            Ok(())
        }
        None => Err(UserError::UserExists(username.to_owned())),
    }
}
