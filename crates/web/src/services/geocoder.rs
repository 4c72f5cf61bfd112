//! Geocoding client for a Nominatim-compatible search endpoint.
//!
//! Resolves free-text addresses to coordinates plus a normalized display
//! address. An empty result list means "address not found" and is not an
//! error; callers route back to a re-editable form.

use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;

/// Maximum number of matches requested per lookup.
const MAX_RESULTS: usize = 5;

/// Errors that can occur when talking to the geocoding service.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A single geocoding match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    /// Normalized address with angle brackets stripped, safe to persist and
    /// render.
    pub formatted_address: String,
}

/// One place in a Nominatim search response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoding API client.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    /// Create a new geocoder client.
    ///
    /// The user agent from the config identifies the application, as the OSM
    /// Nominatim usage policy requires.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocoderError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve a free-text address.
    ///
    /// Returns an empty vec when the address is unknown; callers use the
    /// first match when any exist.
    ///
    /// # Errors
    ///
    /// Returns `GeocoderError` when the request fails, the service responds
    /// with a non-success status, or a coordinate cannot be parsed.
    pub async fn lookup(&self, address: &str) -> Result<Vec<GeocodeMatch>, GeocoderError> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&limit={MAX_RESULTS}",
            self.base_url,
            urlencoding::encode(address)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocoderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocoderError::Parse(e.to_string()))?;

        places.into_iter().map(GeocodeMatch::try_from).collect()
    }
}

impl TryFrom<NominatimPlace> for GeocodeMatch {
    type Error = GeocoderError;

    fn try_from(place: NominatimPlace) -> Result<Self, Self::Error> {
        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocoderError::Parse(format!("bad latitude {:?}: {e}", place.lat)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocoderError::Parse(format!("bad longitude {:?}: {e}", place.lon)))?;

        Ok(Self {
            latitude,
            longitude,
            formatted_address: strip_markup(&place.display_name),
        })
    }
}

/// Remove angle brackets so a hostile display name can't smuggle markup into
/// rendered views.
fn strip_markup(address: &str) -> String {
    address.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("10 Downing Street <script>alert(1)</script>"),
            "10 Downing Street scriptalert(1)/script"
        );
        assert_eq!(strip_markup("no markup here"), "no markup here");
    }

    #[test]
    fn test_place_conversion() {
        let place = NominatimPlace {
            lat: "51.5237740".to_string(),
            lon: "-0.1585557".to_string(),
            display_name: "221B, Baker Street, London <UK>".to_string(),
        };

        let hit = GeocodeMatch::try_from(place).unwrap();
        assert!((hit.latitude - 51.523_774).abs() < 1e-6);
        assert!((hit.longitude - -0.158_555_7).abs() < 1e-6);
        assert_eq!(hit.formatted_address, "221B, Baker Street, London UK");
    }

    #[test]
    fn test_place_conversion_rejects_bad_coordinates() {
        let place = NominatimPlace {
            lat: "not-a-number".to_string(),
            lon: "0.0".to_string(),
            display_name: "somewhere".to_string(),
        };

        assert!(matches!(
            GeocodeMatch::try_from(place),
            Err(GeocoderError::Parse(_))
        ));
    }

    #[test]
    fn test_response_deserializes() {
        let body = r#"[{"lat":"41.8781","lon":"-87.6298","display_name":"Chicago, Cook County, Illinois"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name, "Chicago, Cook County, Illinois");
    }
}
