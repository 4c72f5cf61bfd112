//! Session middleware configuration.
//!
//! Sets up SQLite-backed sessions using tower-sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::RolodexConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "rolodex_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with a SQLite store.
///
/// The caller is responsible for running `store.migrate()` first so the
/// session table exists.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &RolodexConfig,
) -> SessionManagerLayer<SqliteStore> {
    // Secure cookies only when served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
