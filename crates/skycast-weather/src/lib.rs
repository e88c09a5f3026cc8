//! Weather domain for SkyCast
//!
//! Geocoding, forecast fetching and normalization against the Open-Meteo
//! APIs, plus unit conversion and device position sources.

pub mod geocode;
pub mod http;
pub mod location;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod types;
pub mod units;
pub mod wire;

pub use geocode::{GeocodeClient, LocationQuery, UNNAMED_POSITION};
pub use http::OpenMeteoHttp;
pub use location::{ConfiguredPosition, Position, PositionProvider};
pub use normalize::{normalize, DAILY_WINDOW, HOURLY_WINDOW};
pub use provider::{validate_coordinates, ForecastProvider};
pub use retry::RetryConfig;
pub use types::*;
