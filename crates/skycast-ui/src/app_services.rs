//! Application services shared by the dashboard model.
//!
//! `AppServices` owns the tokio runtime, the Open-Meteo clients, the service
//! channels and the suggestion cancellation token. Clients sit behind
//! `RwLock<Option<..>>` so shutdown can release them while the model lives on.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use skycast_core::{Config, SuggestionConfig};
use skycast_weather::{
    ConfiguredPosition, ForecastProvider, GeocodeClient, OpenMeteoHttp, PositionProvider,
    RetryConfig,
};

pub use crate::services::{SuggestionServiceMessage, WeatherServiceMessage};

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    geocoder: RwLock<Option<Arc<GeocodeClient>>>,
    forecast_provider: RwLock<Option<Arc<ForecastProvider>>>,
    position_provider: RwLock<Option<Arc<dyn PositionProvider>>>,

    suggestions: SuggestionConfig,

    weather_service_tx: Sender<WeatherServiceMessage>,
    weather_service_rx: Mutex<Receiver<WeatherServiceMessage>>,

    suggestion_service_tx: Sender<SuggestionServiceMessage>,
    suggestion_service_rx: Mutex<Receiver<SuggestionServiceMessage>>,

    /// Token of the outstanding suggestion request, if any
    suggestion_cancel_token: RwLock<Option<CancellationToken>>,
}

impl AppServices {
    /// Build the runtime and clients from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("skycast-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let services = &config.services;
        let retry = RetryConfig {
            max_retries: services.max_retries,
            ..RetryConfig::default()
        };
        let http = OpenMeteoHttp::new(Duration::from_secs(services.timeout_secs), retry)
            .context("Failed to create HTTP client")?;

        let geocoder = GeocodeClient::new_with_base_url(http.clone(), &services.geocoding_url);
        let forecast = ForecastProvider::new_with_base_url(http, &services.forecast_url)
            .with_forecast_days(services.forecast_days);
        let positions: Arc<dyn PositionProvider> =
            Arc::new(ConfiguredPosition::new(config.device.position()));

        let (weather_service_tx, weather_service_rx) = mpsc::channel();
        let (suggestion_service_tx, suggestion_service_rx) = mpsc::channel();

        tracing::info!(
            "AppServices initialized (geocoding: {}, forecast: {})",
            services.geocoding_url,
            services.forecast_url
        );

        Ok(Self {
            runtime,
            geocoder: RwLock::new(Some(Arc::new(geocoder))),
            forecast_provider: RwLock::new(Some(Arc::new(forecast))),
            position_provider: RwLock::new(Some(positions)),
            suggestions: config.suggestions.clone(),
            weather_service_tx,
            weather_service_rx: Mutex::new(weather_service_rx),
            suggestion_service_tx,
            suggestion_service_rx: Mutex::new(suggestion_service_rx),
            suggestion_cancel_token: RwLock::new(None),
        })
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Cancel outstanding work and release the clients.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");

        self.cancel_suggestions();
        *self.geocoder.write() = None;
        *self.forecast_provider.write() = None;
        *self.position_provider.write() = None;

        tracing::info!("AppServices shutdown complete");
    }

    // =========== Clients ===========

    pub fn geocoder(&self) -> Option<Arc<GeocodeClient>> {
        self.geocoder.read().clone()
    }

    pub fn forecast_provider(&self) -> Option<Arc<ForecastProvider>> {
        self.forecast_provider.read().clone()
    }

    pub fn position_provider(&self) -> Option<Arc<dyn PositionProvider>> {
        self.position_provider.read().clone()
    }

    /// Replace the device position source.
    pub fn set_position_provider(&self, provider: Option<Arc<dyn PositionProvider>>) {
        *self.position_provider.write() = provider;
    }

    pub fn suggestion_config(&self) -> &SuggestionConfig {
        &self.suggestions
    }

    // =========== Weather Service Channel ===========

    pub fn weather_sender(&self) -> &Sender<WeatherServiceMessage> {
        &self.weather_service_tx
    }

    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().try_recv().ok()
    }

    // =========== Suggestion Service Channel ===========

    pub fn suggestion_sender(&self) -> &Sender<SuggestionServiceMessage> {
        &self.suggestion_service_tx
    }

    pub fn try_recv_suggestion_message(&self) -> Option<SuggestionServiceMessage> {
        self.suggestion_service_rx.lock().try_recv().ok()
    }

    // =========== Suggestion Cancellation ===========

    /// Cancel the outstanding suggestion request and install a fresh token.
    pub fn new_suggestion_cancel_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.suggestion_cancel_token.write().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the outstanding suggestion request, if any.
    pub fn cancel_suggestions(&self) {
        if let Some(token) = self.suggestion_cancel_token.write().take() {
            token.cancel();
            tracing::debug!("Outstanding suggestion request cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_cancels_previous() {
        let services = AppServices::new(&Config::default()).unwrap();

        let first = services.new_suggestion_cancel_token();
        let second = services.new_suggestion_cancel_token();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        services.cancel_suggestions();
        assert!(second.is_cancelled());
    }

    #[test]
    fn shutdown_releases_clients() {
        let services = AppServices::new(&Config::default()).unwrap();
        assert!(services.geocoder().is_some());
        assert!(services.forecast_provider().is_some());

        services.shutdown();
        assert!(services.geocoder().is_none());
        assert!(services.forecast_provider().is_none());
        assert!(services.position_provider().is_none());
    }

    #[test]
    fn unconfigured_device_position_is_unavailable() {
        let services = AppServices::new(&Config::default()).unwrap();
        let provider = services.position_provider().unwrap();
        assert!(!provider.is_available());
    }
}
