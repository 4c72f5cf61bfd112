//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROLODEX_DATABASE_URL` - SQLite connection string (e.g., `sqlite://rolodex.db?mode=rwc`)
//!
//! ## Optional
//! - `ROLODEX_HOST` - Bind address (default: 127.0.0.1)
//! - `ROLODEX_PORT` - Listen port (default: 3000)
//! - `ROLODEX_BASE_URL` - Public URL (default: `http://localhost:3000`);
//!   an `https://` URL enables the Secure flag on the session cookie
//! - `GEOCODER_BASE_URL` - Nominatim-compatible endpoint
//!   (default: `https://nominatim.openstreetmap.org`)
//! - `GEOCODER_USER_AGENT` - User-Agent sent to the geocoder (OSM usage policy
//!   requires an identifying agent)
//! - `ROLODEX_BOOTSTRAP_USER` / `ROLODEX_BOOTSTRAP_PASSWORD` - account seeded
//!   at startup if the username is not present
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct RolodexConfig {
    /// SQLite database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the application
    pub base_url: String,
    /// Geocoding service configuration
    pub geocoder: GeocoderConfig,
    /// Account seeded at first run, if configured
    pub bootstrap: Option<BootstrapConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Geocoding service configuration.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible search endpoint
    pub base_url: String,
    /// User-Agent header sent with geocoding requests
    pub user_agent: String,
}

/// First-run bootstrap account.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Username of the seeded account
    pub username: String,
    /// Password of the seeded account (hashed before storage)
    pub password: SecretString,
}

impl RolodexConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ROLODEX_DATABASE_URL")?;
        let host = get_env_or_default("ROLODEX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROLODEX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ROLODEX_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROLODEX_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ROLODEX_BASE_URL", "http://localhost:3000");

        let geocoder = GeocoderConfig::from_env();
        let bootstrap = BootstrapConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            geocoder,
            bootstrap,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GeocoderConfig {
    fn from_env() -> Self {
        Self {
            base_url: get_env_or_default("GEOCODER_BASE_URL", "https://nominatim.openstreetmap.org"),
            user_agent: get_env_or_default(
                "GEOCODER_USER_AGENT",
                concat!("rolodex/", env!("CARGO_PKG_VERSION")),
            ),
        }
    }
}

impl BootstrapConfig {
    /// A bootstrap user is configured only when the username is set; a
    /// username without a password is a configuration error.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(username) = get_optional_env("ROLODEX_BOOTSTRAP_USER") else {
            return Ok(None);
        };
        let password = get_required_env("ROLODEX_BOOTSTRAP_PASSWORD")?;
        Ok(Some(Self {
            username,
            password: SecretString::from(password),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get the database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
