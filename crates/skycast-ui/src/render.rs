//! Plain-text rendering of the dashboard. A pure function of state.

use std::fmt::Write;

use skycast_core::AppError;

use crate::models::DashboardState;

pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    let unit = state.unit;

    let _ = writeln!(out, "SkyCast  [{}]", unit.symbol());

    if !state.query.is_empty() {
        let _ = writeln!(out, "Search: {}", state.query);
    }
    if state.suggestions_pending {
        let _ = writeln!(out, "  searching...");
    }
    for (i, location) in state.suggestions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, location.suggestion_label());
    }

    if let Some(error) = state.alert() {
        let _ = writeln!(out, "! {}", AppError::from(error.clone()).user_message());
    }
    if state.is_loading() {
        let _ = writeln!(out, "Loading...");
    }

    let Some(data) = state.data.as_deref() else {
        if !state.is_loading() {
            let _ = writeln!(out, "No forecast loaded.");
        }
        return out;
    };

    let forecast = &data.forecast;
    let current = &forecast.current;
    let condition = current.condition();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", data.location.label());
    let _ = writeln!(
        out,
        "  {} {}  {}  wind {:.1} km/h",
        condition.icon(),
        condition.description(),
        unit.format(current.temperature_c),
        current.wind_speed_kmh
    );
    if let (Some(sunrise), Some(sunset)) = (&forecast.sunrise, &forecast.sunset) {
        let _ = writeln!(out, "  Sunrise {}  Sunset {}", sunrise, sunset);
    }

    if !forecast.hourly.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Hourly");
        for hour in &forecast.hourly {
            let _ = writeln!(
                out,
                "  {}  {}  {:>7}  {:.1} km/h",
                hour.time_label,
                hour.condition().icon(),
                unit.format(hour.temperature_c),
                hour.wind_speed_kmh
            );
        }
    }

    if !forecast.daily.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}-Day", forecast.daily.len());
        for day in &forecast.daily {
            let _ = writeln!(
                out,
                "  {}  {}  {} / {}",
                day.date_label,
                day.condition().icon(),
                unit.format(day.max_c),
                unit.format(day.min_c)
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, LoadedForecast, Phase};
    use crate::services::DashboardError;
    use chrono::{NaiveDate, NaiveDateTime};
    use skycast_weather::{
        CurrentSnapshot, DailyEntry, Forecast, HourlyEntry, Location, TemperatureUnit,
    };
    use std::sync::Arc;

    fn sample_state() -> DashboardState {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let time = NaiveDateTime::parse_from_str("2026-10-19T14:00", "%Y-%m-%dT%H:%M").unwrap();
        let forecast = Forecast {
            current: CurrentSnapshot {
                temperature_c: 22.0,
                wind_speed_kmh: 9.4,
                weather_code: 2,
                observed_at: "2026-10-19T14:10".to_string(),
            },
            daily: vec![DailyEntry {
                date,
                date_label: "Mon".to_string(),
                max_c: 30.0,
                min_c: 20.0,
                weather_code: 61,
            }],
            hourly: vec![HourlyEntry {
                time,
                time_label: "14:00".to_string(),
                temperature_c: 22.0,
                wind_speed_kmh: 9.4,
                weather_code: 1234,
            }],
            sunrise: Some("06:02".to_string()),
            sunset: Some("17:51".to_string()),
            timezone: None,
        };

        let mut state = DashboardState::default();
        state.phase = Phase::Ready;
        state.data = Some(Arc::new(LoadedForecast {
            location: Location::new("Madanapalle", "India", 13.55, 78.5),
            forecast,
        }));
        state
    }

    #[test]
    fn renders_forecast_in_celsius() {
        let text = render(&sample_state());
        assert!(text.contains("Madanapalle, India"));
        assert!(text.contains("Partly Cloudy  22.0°C"));
        assert!(text.contains("Sunrise 06:02  Sunset 17:51"));
        assert!(text.contains("Mon"));
        assert!(text.contains("30.0°C / 20.0°C"));
        // Unmapped code renders the unknown glyph
        assert!(text.contains("14:00  ?"));
    }

    #[test]
    fn unit_toggle_changes_rendering_only() {
        let state = sample_state().reduce(Action::UnitToggled).state;
        let text = render(&state);
        assert!(text.contains("71.6°F"));
        assert!(text.contains("86.0°F / 68.0°F"));
        assert_eq!(state.unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn alert_shows_user_message_over_data() {
        let mut state = sample_state();
        state.phase = Phase::Error(DashboardError::LocationNotFound("Zzzzznotreal".into()));
        let text = render(&state);
        assert!(text.contains("! City not found!"));
        assert!(text.contains("Madanapalle, India"));
    }

    #[test]
    fn empty_state() {
        let text = render(&DashboardState::default());
        assert!(text.contains("No forecast loaded."));
        assert!(!text.contains("Loading"));
    }

    #[test]
    fn suggestions_are_numbered() {
        let mut state = DashboardState::default();
        state.query = "Mad".to_string();
        state.suggestions = vec![
            Location::new("Madrid", "Spain", 40.4, -3.7),
            Location::new("Madanapalle", "India", 13.55, 78.5),
        ];
        let text = render(&state);
        assert!(text.contains("  1. Madrid, Spain"));
        assert!(text.contains("  2. Madanapalle, India"));
    }
}
