//! Application services.

pub mod auth;
pub mod geocoder;

pub use auth::{AuthError, AuthService};
pub use geocoder::{GeocodeMatch, Geocoder, GeocoderError};
