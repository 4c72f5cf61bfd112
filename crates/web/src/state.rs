//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::RolodexConfig;
use crate::services::geocoder::{Geocoder, GeocoderError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RolodexConfig,
    pool: SqlitePool,
    geocoder: Geocoder,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoder HTTP client cannot be built.
    pub fn new(config: RolodexConfig, pool: SqlitePool) -> Result<Self, GeocoderError> {
        let geocoder = Geocoder::new(&config.geocoder)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                geocoder,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &RolodexConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &Geocoder {
        &self.inner.geocoder
    }
}
