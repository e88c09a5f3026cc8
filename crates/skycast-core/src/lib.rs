pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    Config, DeviceConfig, FORECAST_DAYS_RANGE, DisplayConfig, ServiceConfig, SuggestionConfig, TemperatureUnit,
    ValidationResult,
};
pub use error::{AppError, LocationError, NetworkError, ReqwestErrorExt, WeatherError};

use anyhow::Result;

/// Initialize the core application with the default `info` log level.
pub fn init() -> Result<()> {
    init_with_default_filter("info")
}

/// Initialize tracing/logging. `RUST_LOG` wins over `default_filter` when set.
pub fn init_with_default_filter(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    tracing::info!("SkyCast core initialized");
    Ok(())
}
