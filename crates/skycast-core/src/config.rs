use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Upstream service endpoints and HTTP behaviour
    #[serde(default)]
    pub services: ServiceConfig,

    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Autocomplete settings
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Fixed device position used for "current location"
    #[serde(default)]
    pub device: DeviceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the geocoding API (without the `/v1` suffix)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Base URL of the forecast API (without the `/v1` suffix)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Per-request deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures (timeouts, 5xx, 429)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Days requested from the forecast API (5-16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

/// Allowed `services.forecast_days`: the daily window needs five days and
/// the forecast API serves at most sixteen.
pub const FORECAST_DAYS_RANGE: std::ops::RangeInclusive<u8> = 5..=16;

fn default_forecast_days() -> u8 {
    7
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Initial temperature unit
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// City loaded on startup
    #[serde(default = "default_city")]
    pub default_city: String,
}

fn default_city() -> String {
    "Madanapalle".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::default(),
            default_city: default_city(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Minimum query length (characters) before suggestions are fetched
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of suggestions requested
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Input quiescence required before a request fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_min_query_chars() -> usize {
    3
}

fn default_max_results() -> u8 {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Device position. Both coordinates must be set for "current location" to work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DeviceConfig {
    /// The configured position, if both coordinates are present
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            services: ServiceConfig::default(),
            display: DisplayConfig::default(),
            suggestions: SuggestionConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(
            &self.services.geocoding_url,
            "services.geocoding_url",
            &mut result,
        );
        Self::validate_url(
            &self.services.forecast_url,
            "services.forecast_url",
            &mut result,
        );

        if self.services.timeout_secs == 0 {
            result.add_error("services.timeout_secs", "Timeout must be greater than 0");
        } else if self.services.timeout_secs > 120 {
            result.add_warning(
                "services.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        if !FORECAST_DAYS_RANGE.contains(&self.services.forecast_days) {
            result.add_error(
                "services.forecast_days",
                format!(
                    "Forecast days must be between {} and {}",
                    FORECAST_DAYS_RANGE.start(),
                    FORECAST_DAYS_RANGE.end()
                ),
            );
        }

        if self.display.default_city.trim().is_empty() {
            result.add_warning("display.default_city", "No default city; starting empty");
        }

        if self.suggestions.min_query_chars == 0 {
            result.add_warning(
                "suggestions.min_query_chars",
                "Suggestions will fire on any non-blank input",
            );
        }
        if self.suggestions.max_results == 0 {
            result.add_error(
                "suggestions.max_results",
                "Max results must be greater than 0",
            );
        }
        if self.suggestions.debounce_ms > 5000 {
            result.add_warning(
                "suggestions.debounce_ms",
                "Debounce is unusually long (>5 seconds)",
            );
        }

        match (self.device.latitude, self.device.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("device.latitude", "Latitude must be between -90 and 90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "device.longitude",
                        "Longitude must be between -180 and 180",
                    );
                }
            }
            (None, None) => {}
            _ => {
                result.add_error(
                    "device",
                    "Both latitude and longitude must be set for the device position",
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
