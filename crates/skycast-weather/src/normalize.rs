//! Reshape raw forecast series into the fixed display windows.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{CurrentSnapshot, DailyEntry, Forecast, HourlyEntry, WeatherError};
use crate::wire::{ForecastResponse, RawDaily, RawHourly};

/// Days shown, today included
pub const DAILY_WINDOW: usize = 5;
/// Hours shown, starting at the current hour
pub const HOURLY_WINDOW: usize = 6;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Build a [`Forecast`] from a raw response.
pub fn normalize(raw: &ForecastResponse) -> Result<Forecast, WeatherError> {
    let current = CurrentSnapshot {
        temperature_c: raw.current_weather.temperature,
        wind_speed_kmh: raw.current_weather.windspeed,
        weather_code: raw.current_weather.weathercode,
        observed_at: raw.current_weather.time.clone(),
    };

    let daily = daily_window(&raw.daily)?;
    let start = hourly_start_index(&raw.hourly.time, &current.observed_at);
    let hourly = hourly_window(&raw.hourly, start)?;

    let sunrise = first_time_of_day(&raw.daily.sunrise);
    let sunset = first_time_of_day(&raw.daily.sunset);

    Ok(Forecast {
        current,
        daily,
        hourly,
        sunrise,
        sunset,
        timezone: raw.timezone.clone(),
    })
}

/// First [`DAILY_WINDOW`] days, labelled with their weekday.
pub fn daily_window(daily: &RawDaily) -> Result<Vec<DailyEntry>, WeatherError> {
    let len = daily.time.len();
    check_len("daily.temperature_2m_max", daily.temperature_2m_max.len(), len)?;
    check_len("daily.temperature_2m_min", daily.temperature_2m_min.len(), len)?;
    check_len("daily.weathercode", daily.weathercode.len(), len)?;
    if !daily.sunrise.is_empty() {
        check_len("daily.sunrise", daily.sunrise.len(), len)?;
    }
    if !daily.sunset.is_empty() {
        check_len("daily.sunset", daily.sunset.len(), len)?;
    }

    (0..len.min(DAILY_WINDOW))
        .map(|i| -> Result<DailyEntry, WeatherError> {
            let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d")
                .map_err(|e| WeatherError::Parse(format!("Invalid date {:?}: {}", daily.time[i], e)))?;
            Ok(DailyEntry {
                date,
                date_label: date.format("%a").to_string(),
                max_c: required(daily.temperature_2m_max[i], "daily.temperature_2m_max", i)?,
                min_c: required(daily.temperature_2m_min[i], "daily.temperature_2m_min", i)?,
                weather_code: required(daily.weathercode[i], "daily.weathercode", i)?,
            })
        })
        .collect()
}

/// Index of the hourly entry in the same hour as `observed_at`.
///
/// `None` when no entry matches or `observed_at` is unparseable.
pub fn current_hour_index(times: &[String], observed_at: &str) -> Option<usize> {
    let observed = parse_datetime(observed_at)?;
    let prefix = observed.format("%Y-%m-%dT%H").to_string();
    times.iter().position(|t| t.starts_with(&prefix))
}

/// Start of the hourly window; falls back to 0 when the current hour is not found.
pub fn hourly_start_index(times: &[String], observed_at: &str) -> usize {
    match current_hour_index(times, observed_at) {
        Some(index) => index,
        None => {
            tracing::warn!(
                "No hourly entry matches current time {:?}, starting hourly window at index 0",
                observed_at
            );
            0
        }
    }
}

/// Up to [`HOURLY_WINDOW`] hours from `start`, clipped at the end of the series.
pub fn hourly_window(hourly: &RawHourly, start: usize) -> Result<Vec<HourlyEntry>, WeatherError> {
    let len = hourly.time.len();
    check_len("hourly.temperature_2m", hourly.temperature_2m.len(), len)?;
    check_len("hourly.windspeed_10m", hourly.windspeed_10m.len(), len)?;
    check_len("hourly.weathercode", hourly.weathercode.len(), len)?;

    let start = start.min(len);
    let end = (start + HOURLY_WINDOW).min(len);

    (start..end)
        .map(|i| -> Result<HourlyEntry, WeatherError> {
            let raw_time = &hourly.time[i];
            let time = parse_datetime(raw_time)
                .ok_or_else(|| WeatherError::Parse(format!("Invalid hourly time {:?}", raw_time)))?;
            Ok(HourlyEntry {
                time,
                time_label: time.format("%H:%M").to_string(),
                temperature_c: required(hourly.temperature_2m[i], "hourly.temperature_2m", i)?,
                wind_speed_kmh: required(hourly.windspeed_10m[i], "hourly.windspeed_10m", i)?,
                weather_code: required(hourly.weathercode[i], "hourly.weathercode", i)?,
            })
        })
        .collect()
}

/// `HH:MM` portion of a local ISO-8601 timestamp.
pub fn time_of_day(timestamp: &str) -> Option<String> {
    if let Some(parsed) = parse_datetime(timestamp) {
        return Some(parsed.format("%H:%M").to_string());
    }
    timestamp
        .split_once('T')
        .map(|(_, time)| time.to_string())
        .filter(|time| !time.is_empty())
}

fn first_time_of_day(series: &[Option<String>]) -> Option<String> {
    series.first()?.as_deref().and_then(time_of_day)
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

fn check_len(field: &str, actual: usize, expected: usize) -> Result<(), WeatherError> {
    if actual == expected {
        Ok(())
    } else {
        Err(WeatherError::Parse(format!(
            "{} has {} entries but time has {}",
            field, actual, expected
        )))
    }
}

fn required<T: Copy>(value: Option<T>, field: &str, index: usize) -> Result<T, WeatherError> {
    value.ok_or_else(|| WeatherError::Parse(format!("{}[{}] is null", field, index)))
}
