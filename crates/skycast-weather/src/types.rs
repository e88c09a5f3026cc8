use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::units;

/// Temperature unit used at render time. Stored data is always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl From<skycast_core::TemperatureUnit> for TemperatureUnit {
    fn from(unit: skycast_core::TemperatureUnit) -> Self {
        match unit {
            skycast_core::TemperatureUnit::Celsius => Self::Celsius,
            skycast_core::TemperatureUnit::Fahrenheit => Self::Fahrenheit,
        }
    }
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    /// Convert a stored Celsius value into this unit, rounded to one decimal.
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => units::round_tenth(celsius),
            Self::Fahrenheit => units::celsius_to_fahrenheit(celsius),
        }
    }

    /// Format a stored Celsius value in this unit, e.g. `"71.6°F"`.
    pub fn format(self, celsius: f64) -> String {
        format!("{:.1}{}", self.from_celsius(celsius), self.symbol())
    }

    /// Parse user input such as `c`, `celsius`, `F`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "c" | "celsius" => Some(Self::Celsius),
            "f" | "fahrenheit" => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Sleet,
    Snow,
    Thunderstorm,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 | 2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 65 | 80 | 81 | 82 => Self::Rain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Sleet => "Sleet",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Terminal glyph for this category
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁",
            Self::Fog => "🌫",
            Self::Drizzle => "🌦",
            Self::Rain => "🌧",
            Self::Sleet => "🌨",
            Self::Snow => "❄",
            Self::Thunderstorm => "⛈",
            Self::Unknown => "?",
        }
    }
}

/// A resolved place. Immutable once produced by geocoding or a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// First-level region, used to tell apart same-named suggestions
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            admin1: None,
            latitude,
            longitude,
        }
    }

    /// `"Name, Country"`, or just the name when the country is unknown.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    /// Label including the region, for suggestion lists.
    pub fn suggestion_label(&self) -> String {
        match self.admin1.as_deref().filter(|a| !a.is_empty() && *a != self.name) {
            Some(region) if !self.country.is_empty() => {
                format!("{}, {}, {}", self.name, region, self.country)
            }
            Some(region) => format!("{}, {}", self.name, region),
            None => self.label(),
        }
    }
}

/// Current conditions as reported alongside the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
    /// Local ISO-8601 timestamp of the observation, e.g. `2026-10-19T14:15`
    pub observed_at: String,
}

impl CurrentSnapshot {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// One day of the daily window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    /// Weekday abbreviation, e.g. `Mon`
    pub date_label: String,
    pub max_c: f64,
    pub min_c: f64,
    pub weather_code: i32,
}

impl DailyEntry {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// One hour of the hourly window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    /// Time of day, e.g. `14:00`
    pub time_label: String,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
}

impl HourlyEntry {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_wmo_code(self.weather_code)
    }
}

/// Normalized forecast: current snapshot plus fixed-size display windows.
///
/// Always replaced as a whole so the windows never go stale relative to `current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentSnapshot,
    pub daily: Vec<DailyEntry>,
    pub hourly: Vec<HourlyEntry>,
    /// Sunrise of the first day, `HH:MM`
    pub sunrise: Option<String>,
    /// Sunset of the first day, `HH:MM`
    pub sunset: Option<String>,
    pub timezone: Option<String>,
}

pub use skycast_core::LocationError;

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Empty location query")]
    EmptyQuery,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}
