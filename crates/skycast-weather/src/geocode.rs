//! Forward and reverse geocoding against the Open-Meteo geocoding API.

use tracing::instrument;

use crate::http::{normalize_base_url, OpenMeteoHttp};
use crate::provider::validate_coordinates;
use crate::types::{Location, WeatherError};
use crate::wire::GeocodingResponse;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

/// Label used when a device position has no reverse-geocoding match
pub const UNNAMED_POSITION: &str = "Your Location";

/// What the user asked for: a free-text name, or a place already resolved
/// by a suggestion pick or the device position.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Resolved(Location),
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: OpenMeteoHttp,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(http: OpenMeteoHttp) -> Self {
        Self::new_with_base_url(http, DEFAULT_GEOCODING_URL)
    }

    pub fn new_with_base_url(http: OpenMeteoHttp, base_url: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Search by name, in the provider's relevance order.
    ///
    /// An absent `results` key yields an empty list.
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str, count: u8) -> Result<Vec<Location>, WeatherError> {
        let url = format!("{}/v1/search", self.base_url);
        tracing::debug!("Geocoding search: {}?name={}", url, name);

        let response: GeocodingResponse = self
            .http
            .get_json(
                &url,
                &[
                    ("name", name.to_string()),
                    ("count", count.to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .take(usize::from(count))
            .map(Location::from)
            .collect())
    }

    /// Nearest named place for a coordinate pair, if any.
    #[instrument(skip(self))]
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Location>, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/v1/reverse", self.base_url);
        tracing::debug!("Reverse geocoding: {} ({}, {})", url, latitude, longitude);

        let response: GeocodingResponse = self
            .http
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .and_then(|results| results.into_iter().next())
            .map(Location::from))
    }

    /// Resolve a query to a single location.
    ///
    /// Names are trimmed; an empty name is rejected without a request.
    pub async fn resolve(&self, query: LocationQuery) -> Result<Location, WeatherError> {
        match query {
            LocationQuery::Resolved(location) => Ok(location),
            LocationQuery::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(WeatherError::EmptyQuery);
                }

                let location = self
                    .search(name, 1)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))?;

                tracing::info!("Resolved {:?} to {}", name, location.label());
                Ok(location)
            }
        }
    }

    /// Name a device position.
    ///
    /// The device coordinates are kept. Lookup failures are logged and fall
    /// back to [`UNNAMED_POSITION`].
    pub async fn name_position(&self, latitude: f64, longitude: f64) -> Location {
        match self.reverse(latitude, longitude).await {
            Ok(Some(place)) => {
                tracing::info!("Device position named {}", place.label());
                Location {
                    latitude,
                    longitude,
                    ..place
                }
            }
            Ok(None) => Location::new(UNNAMED_POSITION, "", latitude, longitude),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                Location::new(UNNAMED_POSITION, "", latitude, longitude)
            }
        }
    }
}
