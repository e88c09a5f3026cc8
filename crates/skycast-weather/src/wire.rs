//! Open-Meteo response shapes as they arrive on the wire.
//!
//! Series values are `Option` because the API emits `null` for missing samples.

use serde::Deserialize;

use crate::types::Location;

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    /// Absent entirely when nothing matched
    #[serde(default)]
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            name: result.name,
            country: result.country.unwrap_or_default(),
            admin1: result.admin1,
            latitude: result.latitude,
            longitude: result.longitude,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    pub current_weather: RawCurrentWeather,
    pub daily: RawDaily,
    pub hourly: RawHourly,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentWeather {
    pub time: String,
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
    pub weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}
