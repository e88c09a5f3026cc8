//! Dashboard state machine.
//!
//! `Idle -> Loading -> {Ready, Error}`. The state is a plain value; every
//! change goes through [`DashboardState::reduce`], which returns the next
//! state plus the side effects the model must run.

use std::sync::Arc;

use skycast_weather::{Forecast, Location, LocationQuery, TemperatureUnit};

use crate::services::DashboardError;

/// Lifecycle phase of the main forecast
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Alert is showing; the last loaded data stays visible underneath
    Error(DashboardError),
}

/// A location together with the forecast fetched for it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedForecast {
    pub location: Location,
    pub forecast: Forecast,
}

#[derive(Debug, Clone)]
pub enum Action {
    Search { query: String },
    SuggestionSelect { location: Location },
    LocateRequested,
    GeolocationResolved { seq: u64, location: Location },
    FetchSucceeded { seq: u64, location: Location, forecast: Forecast },
    FetchFailed { seq: u64, error: DashboardError },
    QueryChanged { text: String },
    SuggestionsReceived { seq: u64, results: Vec<Location> },
    SuggestionsFailed { seq: u64 },
    UnitChanged { unit: TemperatureUnit },
    UnitToggled,
    AlertDismissed,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ResolveAndFetch { seq: u64, query: LocationQuery },
    LocateDevice { seq: u64 },
    FetchSuggestions { seq: u64, query: String },
    CancelSuggestions,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: DashboardState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub phase: Phase,
    /// Last successfully loaded forecast, swapped as a whole
    pub data: Option<Arc<LoadedForecast>>,
    pub unit: TemperatureUnit,
    /// Raw text of the search box
    pub query: String,
    pub suggestions: Vec<Location>,
    pub suggestions_pending: bool,
    /// Latest issued forecast request; older replies are dropped
    pub fetch_seq: u64,
    /// Latest issued suggestion request; older replies are dropped
    pub suggestion_seq: u64,
    pub min_query_chars: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(TemperatureUnit::default(), 3)
    }
}

impl DashboardState {
    pub fn new(unit: TemperatureUnit, min_query_chars: usize) -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            unit,
            query: String::new(),
            suggestions: Vec::new(),
            suggestions_pending: false,
            fetch_seq: 0,
            suggestion_seq: 0,
            min_query_chars,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Error currently shown in the alert line, if any
    pub fn alert(&self) -> Option<&DashboardError> {
        match &self.phase {
            Phase::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        self.data.as_ref().map(|d| &d.location)
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.data.as_ref().map(|d| &d.forecast)
    }

    pub fn reduce(&self, action: Action) -> Transition {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match action {
            Action::Search { query } => {
                let name = query.trim().to_string();
                next.query = query;
                if name.is_empty() {
                    // Supersede any load still in flight so it cannot clear the alert
                    next.fetch_seq += 1;
                    next.phase = Phase::Error(DashboardError::EmptyQuery);
                } else {
                    next.clear_suggestions();
                    next.fetch_seq += 1;
                    next.phase = Phase::Loading;
                    effects.push(Effect::CancelSuggestions);
                    effects.push(Effect::ResolveAndFetch {
                        seq: next.fetch_seq,
                        query: LocationQuery::Name(name),
                    });
                }
            }
            Action::SuggestionSelect { location } => {
                next.clear_suggestions();
                next.query = location.name.clone();
                next.fetch_seq += 1;
                next.phase = Phase::Loading;
                effects.push(Effect::CancelSuggestions);
                effects.push(Effect::ResolveAndFetch {
                    seq: next.fetch_seq,
                    query: LocationQuery::Resolved(location),
                });
            }
            Action::LocateRequested => {
                next.fetch_seq += 1;
                next.phase = Phase::Loading;
                effects.push(Effect::LocateDevice { seq: next.fetch_seq });
            }
            Action::GeolocationResolved { seq, location } => {
                if seq == self.fetch_seq {
                    effects.push(Effect::ResolveAndFetch {
                        seq,
                        query: LocationQuery::Resolved(location),
                    });
                } else {
                    tracing::debug!("Ignoring stale position for request {}", seq);
                }
            }
            Action::FetchSucceeded { seq, location, forecast } => {
                if seq == self.fetch_seq {
                    next.data = Some(Arc::new(LoadedForecast { location, forecast }));
                    next.phase = Phase::Ready;
                } else {
                    tracing::debug!("Ignoring stale forecast for request {}", seq);
                }
            }
            Action::FetchFailed { seq, error } => {
                if seq == self.fetch_seq {
                    next.phase = Phase::Error(error);
                } else {
                    tracing::debug!("Ignoring stale failure for request {}", seq);
                }
            }
            Action::QueryChanged { text } => {
                let trimmed = text.trim().to_string();
                next.query = text;
                next.suggestion_seq += 1;
                effects.push(Effect::CancelSuggestions);

                if !trimmed.is_empty() && trimmed.chars().count() >= self.min_query_chars {
                    next.suggestions_pending = true;
                    effects.push(Effect::FetchSuggestions {
                        seq: next.suggestion_seq,
                        query: trimmed,
                    });
                } else {
                    next.suggestions.clear();
                    next.suggestions_pending = false;
                }
            }
            Action::SuggestionsReceived { seq, results } => {
                if seq == self.suggestion_seq && self.suggestions_pending {
                    next.suggestions = results;
                    next.suggestions_pending = false;
                }
            }
            Action::SuggestionsFailed { seq } => {
                if seq == self.suggestion_seq {
                    next.suggestions.clear();
                    next.suggestions_pending = false;
                }
            }
            Action::UnitChanged { unit } => {
                next.unit = unit;
            }
            Action::UnitToggled => {
                next.unit = self.unit.toggled();
            }
            Action::AlertDismissed => {
                if matches!(self.phase, Phase::Error(_)) {
                    next.phase = if self.data.is_some() {
                        Phase::Ready
                    } else {
                        Phase::Idle
                    };
                }
            }
        }

        Transition { state: next, effects }
    }

    /// Drop the list and invalidate any outstanding suggestion request
    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_pending = false;
        self.suggestion_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_weather::CurrentSnapshot;

    fn madanapalle() -> Location {
        Location::new("Madanapalle", "India", 13.55, 78.5)
    }

    fn forecast(temp: f64) -> Forecast {
        Forecast {
            current: CurrentSnapshot {
                temperature_c: temp,
                wind_speed_kmh: 5.0,
                weather_code: 0,
                observed_at: "2026-10-19T10:00".to_string(),
            },
            daily: Vec::new(),
            hourly: Vec::new(),
            sunrise: None,
            sunset: None,
            timezone: None,
        }
    }

    fn apply(state: &DashboardState, action: Action) -> DashboardState {
        state.reduce(action).state
    }

    fn loaded(temp: f64) -> DashboardState {
        let s = apply(&DashboardState::default(), Action::Search { query: "Madanapalle".into() });
        apply(
            &s,
            Action::FetchSucceeded { seq: s.fetch_seq, location: madanapalle(), forecast: forecast(temp) },
        )
    }

    #[test]
    fn search_enters_loading_and_requests_fetch() {
        let t = DashboardState::default().reduce(Action::Search { query: "  Madanapalle ".into() });
        assert!(t.state.is_loading());
        assert_eq!(t.state.fetch_seq, 1);
        assert_eq!(
            t.effects,
            vec![
                Effect::CancelSuggestions,
                Effect::ResolveAndFetch { seq: 1, query: LocationQuery::Name("Madanapalle".into()) },
            ]
        );
    }

    #[test]
    fn empty_search_raises_alert_without_effects() {
        let before = loaded(20.0);
        let t = before.reduce(Action::Search { query: "   ".into() });
        assert_eq!(t.state.alert(), Some(&DashboardError::EmptyQuery));
        assert!(t.effects.is_empty());
        assert!(!t.state.is_loading());
        assert_eq!(t.state.data, before.data);
    }

    #[test]
    fn fetch_success_sets_ready() {
        let s = loaded(21.0);
        assert_eq!(s.phase, Phase::Ready);
        assert!(!s.is_loading());
        assert_eq!(s.location().map(Location::label).as_deref(), Some("Madanapalle, India"));
        assert_eq!(s.forecast().map(|f| f.current.temperature_c), Some(21.0));
    }

    #[test]
    fn failure_keeps_previous_forecast() {
        let ready = loaded(21.0);
        let s = apply(&ready, Action::Search { query: "Zzzzznotreal".into() });
        let s = apply(
            &s,
            Action::FetchFailed {
                seq: s.fetch_seq,
                error: DashboardError::LocationNotFound("Zzzzznotreal".into()),
            },
        );

        assert!(!s.is_loading());
        assert!(matches!(s.alert(), Some(DashboardError::LocationNotFound(_))));
        assert_eq!(s.data, ready.data);
    }

    #[test]
    fn dismiss_returns_to_ready_with_data() {
        let s = apply(&loaded(21.0), Action::Search { query: "".into() });
        assert_eq!(apply(&s, Action::AlertDismissed).phase, Phase::Ready);
    }

    #[test]
    fn dismiss_returns_to_idle_without_data() {
        let s = apply(&DashboardState::default(), Action::Search { query: "".into() });
        assert_eq!(apply(&s, Action::AlertDismissed).phase, Phase::Idle);
    }

    #[test]
    fn dismiss_outside_error_is_noop() {
        let s = DashboardState::default();
        assert_eq!(apply(&s, Action::AlertDismissed), s);
    }

    #[test]
    fn empty_search_supersedes_load_in_flight() {
        let s = apply(&DashboardState::default(), Action::Search { query: "Madanapalle".into() });
        let in_flight = s.fetch_seq;

        let s = apply(&s, Action::Search { query: "  ".into() });
        assert!(!s.is_loading());
        assert_eq!(s.alert(), Some(&DashboardError::EmptyQuery));

        let s = apply(
            &s,
            Action::FetchSucceeded { seq: in_flight, location: madanapalle(), forecast: forecast(1.0) },
        );
        assert_eq!(s.alert(), Some(&DashboardError::EmptyQuery));
        assert!(s.data.is_none());

        let s = apply(&s, Action::AlertDismissed);
        assert_eq!(s.phase, Phase::Idle);
    }

    #[test]
    fn stale_fetch_results_are_ignored() {
        let s = apply(&DashboardState::default(), Action::Search { query: "Lisbon".into() });
        let stale_seq = s.fetch_seq;
        let s = apply(&s, Action::Search { query: "Madanapalle".into() });

        let after_stale = apply(
            &s,
            Action::FetchSucceeded { seq: stale_seq, location: madanapalle(), forecast: forecast(1.0) },
        );
        assert!(after_stale.is_loading());
        assert!(after_stale.data.is_none());

        let after_stale_failure = apply(
            &s,
            Action::FetchFailed { seq: stale_seq, error: DashboardError::NotInitialized },
        );
        assert!(after_stale_failure.is_loading());
    }

    #[test]
    fn locate_flow_chains_into_fetch() {
        let t = DashboardState::default().reduce(Action::LocateRequested);
        assert_eq!(t.effects, vec![Effect::LocateDevice { seq: 1 }]);

        let here = Location::new("Your Location", "", 1.0, 2.0);
        let t = t.state.reduce(Action::GeolocationResolved { seq: 1, location: here.clone() });
        assert!(t.state.is_loading());
        assert_eq!(
            t.effects,
            vec![Effect::ResolveAndFetch { seq: 1, query: LocationQuery::Resolved(here) }]
        );
    }

    #[test]
    fn stale_position_is_ignored() {
        let s = apply(&DashboardState::default(), Action::LocateRequested);
        let s = apply(&s, Action::Search { query: "Madanapalle".into() });
        let t = s.reduce(Action::GeolocationResolved { seq: 1, location: madanapalle() });
        assert!(t.effects.is_empty());
    }

    #[test]
    fn short_query_clears_suggestions() {
        let mut s = DashboardState::default();
        s.suggestions = vec![madanapalle()];
        let t = s.reduce(Action::QueryChanged { text: "Ma".into() });
        assert!(t.state.suggestions.is_empty());
        assert!(!t.state.suggestions_pending);
        assert_eq!(t.effects, vec![Effect::CancelSuggestions]);
    }

    #[test]
    fn min_length_counts_trimmed_characters() {
        let t = DashboardState::default().reduce(Action::QueryChanged { text: "  ab  ".into() });
        assert!(!t.state.suggestions_pending);

        // Multi-byte characters count once each
        let t = DashboardState::default().reduce(Action::QueryChanged { text: "Köl".into() });
        assert!(t.state.suggestions_pending);
    }

    #[test]
    fn long_query_requests_suggestions() {
        let t = DashboardState::default().reduce(Action::QueryChanged { text: "Mad ".into() });
        assert!(t.state.suggestions_pending);
        assert_eq!(
            t.effects,
            vec![
                Effect::CancelSuggestions,
                Effect::FetchSuggestions { seq: 1, query: "Mad".into() },
            ]
        );
    }

    #[test]
    fn only_latest_suggestions_apply() {
        let s = apply(&DashboardState::default(), Action::QueryChanged { text: "Mad".into() });
        let s = apply(&s, Action::QueryChanged { text: "Madr".into() });
        assert_eq!(s.suggestion_seq, 2);

        let madrid = Location::new("Madrid", "Spain", 40.4, -3.7);
        let s = apply(&s, Action::SuggestionsReceived { seq: 2, results: vec![madrid.clone()] });
        let s = apply(&s, Action::SuggestionsReceived { seq: 1, results: vec![madanapalle()] });

        assert_eq!(s.suggestions, vec![madrid]);
        assert!(!s.suggestions_pending);
    }

    #[test]
    fn suggestion_failure_clears_pending() {
        let s = apply(&DashboardState::default(), Action::QueryChanged { text: "Mad".into() });
        let s = apply(&s, Action::SuggestionsFailed { seq: 1 });
        assert!(!s.suggestions_pending);
        assert!(s.alert().is_none());
    }

    #[test]
    fn select_skips_geocoding_and_invalidates_suggestions() {
        let s = apply(&DashboardState::default(), Action::QueryChanged { text: "Mad".into() });
        let s = apply(&s, Action::SuggestionsReceived { seq: 1, results: vec![madanapalle()] });

        let t = s.reduce(Action::SuggestionSelect { location: madanapalle() });
        assert!(t.state.suggestions.is_empty());
        assert!(t.state.is_loading());
        assert_eq!(t.state.query, "Madanapalle");
        assert_eq!(
            t.effects,
            vec![
                Effect::CancelSuggestions,
                Effect::ResolveAndFetch { seq: 1, query: LocationQuery::Resolved(madanapalle()) },
            ]
        );

        // A late reply to the old query no longer applies
        let late = t.state.reduce(Action::SuggestionsReceived { seq: 1, results: vec![madanapalle()] });
        assert!(late.state.suggestions.is_empty());
    }

    #[test]
    fn unit_changes_leave_data_untouched() {
        let s = loaded(22.0);
        let toggled = apply(&s, Action::UnitToggled);
        assert_eq!(toggled.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(toggled.data, s.data);

        let set = apply(&toggled, Action::UnitChanged { unit: TemperatureUnit::Celsius });
        assert_eq!(set.unit, TemperatureUnit::Celsius);
        assert_eq!(set.forecast().map(|f| f.current.temperature_c), Some(22.0));
    }
}
