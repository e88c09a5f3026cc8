//! Shared HTTP plumbing for the Open-Meteo clients.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::retry::{with_retry, RetryConfig};
use crate::types::WeatherError;

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

/// Cheap-to-clone HTTP client with a fixed timeout and retry policy
#[derive(Debug, Clone)]
pub struct OpenMeteoHttp {
    client: Arc<Client>,
    retry: RetryConfig,
}

impl OpenMeteoHttp {
    pub fn new(timeout: Duration, retry: RetryConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            retry,
        })
    }

    /// GET `url` with `query` and decode the JSON body.
    ///
    /// Non-2xx statuses become [`WeatherError::Http`]; undecodable bodies
    /// become [`WeatherError::Parse`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = with_retry(&self.retry, || self.client.get(url).query(query).send()).await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("GET {} returned {}: {}", url, status, message);
            return Err(WeatherError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

/// Trim a trailing slash so `format!("{base}/v1/...")` stays well-formed.
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
