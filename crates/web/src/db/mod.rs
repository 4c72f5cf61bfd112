//! Database operations for the contacts store.
//!
//! # Tables
//!
//! - `users` - Site authentication accounts
//! - `contacts` - The contact book itself
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! Contacts are not owned by users; authentication only gates which routes a
//! session may reach.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run at startup, or
//! explicitly via:
//! ```bash
//! cargo run -p rolodex-cli -- migrate
//! ```

pub mod contacts;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use contacts::ContactRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/web/migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created on first run.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options =
        SqliteConnectOptions::from_str(database_url.expose_secret())?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MIGRATOR, SqlitePoolOptions, SqlitePool};

    /// In-memory database for tests.
    ///
    /// A single connection keeps every query on the same `:memory:` database.
    #[allow(clippy::unwrap_used)]
    pub async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }
}
