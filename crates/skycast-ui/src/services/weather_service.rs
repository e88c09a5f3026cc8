//! Weather backend: geocoding, forecast fetching and device position.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_core::{NetworkError, ReqwestErrorExt};
use skycast_weather::{
    Forecast, ForecastProvider, GeocodeClient, Location, LocationError, LocationQuery,
    PositionProvider, WeatherError,
};

/// Error kinds the dashboard can display. Cloneable so state can hold them.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    LocationNotFound(String),
    NetworkFailure(NetworkError),
    ForecastUnavailable(String),
    GeolocationDenied(LocationError),
    EmptyQuery,
    NotInitialized,
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::LocationNotFound(s) => write!(f, "Location not found: {}", s),
            DashboardError::NetworkFailure(e) => write!(f, "Network failure: {}", e),
            DashboardError::ForecastUnavailable(s) => write!(f, "Forecast unavailable: {}", s),
            DashboardError::GeolocationDenied(e) => write!(f, "Geolocation denied: {}", e),
            DashboardError::EmptyQuery => write!(f, "Empty search query"),
            DashboardError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<WeatherError> for DashboardError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::LocationNotFound(name) => DashboardError::LocationNotFound(name),
            WeatherError::EmptyQuery => DashboardError::EmptyQuery,
            WeatherError::Network(e) => DashboardError::NetworkFailure(e.into_network_error()),
            WeatherError::Http { status, message } => {
                DashboardError::NetworkFailure(NetworkError::ServerError { status, message })
            }
            WeatherError::Parse(s) => DashboardError::ForecastUnavailable(s),
            e @ WeatherError::InvalidCoordinates { .. } => {
                DashboardError::ForecastUnavailable(e.to_string())
            }
            WeatherError::Location(e) => DashboardError::GeolocationDenied(e),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Location resolved and forecast fetched for request `seq`
    FetchDone {
        seq: u64,
        result: Result<(Location, Forecast), DashboardError>,
    },
    /// Device position named for request `seq`
    PositionResolved {
        seq: u64,
        result: Result<Location, DashboardError>,
    },
}

/// Resolve `query` (geocoding names only) and fetch its forecast.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    geocoder: Arc<GeocodeClient>,
    provider: Arc<ForecastProvider>,
    seq: u64,
    query: LocationQuery,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = async {
            let location = geocoder.resolve(query).await?;
            let forecast = provider.fetch(&location).await?;
            Ok::<_, WeatherError>((location, forecast))
        }
        .await
        .map_err(|e| {
            tracing::error!("Weather fetch {} failed: {}", seq, e);
            DashboardError::from(e)
        });

        let _ = tx.send(WeatherServiceMessage::FetchDone { seq, result });
    });
}

/// Read the device position and name it by reverse geocoding.
/// Sends `PositionResolved` on the channel when complete.
pub fn request_locate(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    geocoder: Arc<GeocodeClient>,
    positions: Arc<dyn PositionProvider>,
    seq: u64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = match positions.current_position() {
            Ok(position) => {
                tracing::info!("Got position: {}, {}", position.latitude, position.longitude);
                Ok(geocoder.name_position(position.latitude, position.longitude).await)
            }
            Err(e) => {
                tracing::warn!("Device position unavailable: {}", e);
                Err(DashboardError::GeolocationDenied(e))
            }
        };

        let _ = tx.send(WeatherServiceMessage::PositionResolved { seq, result });
    });
}
