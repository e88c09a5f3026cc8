use crate::services::DashboardError;
use skycast_core::{AppError, WeatherError};

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::LocationNotFound(s) => AppError::Weather(WeatherError::LocationNotFound(s)),
            DashboardError::NetworkFailure(e) => AppError::Network(e),
            DashboardError::ForecastUnavailable(s) => {
                AppError::Weather(WeatherError::ForecastUnavailable(s))
            }
            DashboardError::GeolocationDenied(e) => AppError::Location(e),
            DashboardError::EmptyQuery => AppError::Weather(WeatherError::EmptyQuery),
            DashboardError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
