use skycast_core::FORECAST_DAYS_RANGE;
use tracing::instrument;

use crate::http::{normalize_base_url, OpenMeteoHttp};
use crate::normalize::normalize;
use crate::types::{Forecast, Location, WeatherError};
use crate::wire::ForecastResponse;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,sunrise,sunset,weathercode";
const HOURLY_FIELDS: &str = "temperature_2m,windspeed_10m,weathercode";

/// Reject coordinates outside [-90, 90] x [-180, 180]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidCoordinates { latitude, longitude });
    }
    Ok(())
}

/// Open-Meteo forecast client
#[derive(Debug, Clone)]
pub struct ForecastProvider {
    http: OpenMeteoHttp,
    base_url: String,
    forecast_days: u8,
}

impl ForecastProvider {
    pub fn new(http: OpenMeteoHttp) -> Self {
        Self::new_with_base_url(http, DEFAULT_FORECAST_URL)
    }

    pub fn new_with_base_url(http: OpenMeteoHttp, base_url: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    /// Number of days requested, clamped to 5..=16 so the daily window is always full
    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days.clamp(*FORECAST_DAYS_RANGE.start(), *FORECAST_DAYS_RANGE.end());
        self
    }

    /// Fetch the raw current/daily/hourly series.
    #[instrument(skip(self))]
    pub async fn fetch_raw(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/v1/forecast", self.base_url);
        tracing::debug!("Fetching forecast: {} ({}, {})", url, latitude, longitude);

        self.http
            .get_json(
                &url,
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                    ("current_weather", "true".to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("hourly", HOURLY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                    ("forecast_days", self.forecast_days.to_string()),
                ],
            )
            .await
    }

    /// Fetch and normalize the forecast for a resolved location.
    pub async fn fetch(&self, location: &Location) -> Result<Forecast, WeatherError> {
        let raw = self.fetch_raw(location.latitude, location.longitude).await?;
        let forecast = normalize(&raw)?;
        tracing::info!(
            "Forecast for {}: {} daily, {} hourly entries",
            location.label(),
            forecast.daily.len(),
            forecast.hourly.len()
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(13.55, 78.5).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(matches!(
            validate_coordinates(91.0, 0.0),
            Err(WeatherError::InvalidCoordinates { .. })
        ));
        assert!(validate_coordinates(0.0, 180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_forecast_days_clamped_to_full_window() {
        let http = OpenMeteoHttp::new(std::time::Duration::from_secs(1), Default::default()).unwrap();
        let provider = ForecastProvider::new(http);
        assert_eq!(provider.clone().with_forecast_days(2).forecast_days, 5);
        assert_eq!(provider.clone().with_forecast_days(7).forecast_days, 7);
        assert_eq!(provider.with_forecast_days(40).forecast_days, 16);
    }
}
