//! Dashboard model: owns the state and runs the effects the reducer asks for.
//!
//! Lives on the UI thread. Background tasks only talk to it through the
//! service channels, drained by [`DashboardModel::poll_channel`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use skycast_weather::{Location, TemperatureUnit};

use crate::app_services::AppServices;
use crate::models::dashboard_state::{Action, DashboardState, Effect, Transition};
use crate::services::{
    self, DashboardError, SuggestionRequest, SuggestionServiceMessage, WeatherServiceMessage,
};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub struct DashboardModel {
    state: DashboardState,
    services: Arc<AppServices>,
}

impl DashboardModel {
    pub fn new(services: Arc<AppServices>, unit: TemperatureUnit) -> Self {
        let min_chars = services.suggestion_config().min_query_chars;
        Self {
            state: DashboardState::new(unit, min_chars),
            services,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Feed one action through the reducer and run the resulting effects.
    pub fn dispatch(&mut self, action: Action) {
        let Transition { state, effects } = self.state.reduce(action);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    pub fn search(&mut self, query: &str) {
        self.dispatch(Action::Search {
            query: query.to_string(),
        });
    }

    pub fn locate(&mut self) {
        self.dispatch(Action::LocateRequested);
    }

    pub fn set_query(&mut self, text: &str) {
        self.dispatch(Action::QueryChanged {
            text: text.to_string(),
        });
    }

    pub fn select_location(&mut self, location: Location) {
        self.dispatch(Action::SuggestionSelect { location });
    }

    /// Pick a suggestion by its position in the current list.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        match self.state.suggestions.get(index).cloned() {
            Some(location) => {
                self.select_location(location);
                true
            }
            None => false,
        }
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.dispatch(Action::UnitChanged { unit });
    }

    pub fn toggle_unit(&mut self) {
        self.dispatch(Action::UnitToggled);
    }

    pub fn dismiss_alert(&mut self) {
        self.dispatch(Action::AlertDismissed);
    }

    /// Forecast load or suggestion search still outstanding
    pub fn is_busy(&self) -> bool {
        self.state.is_loading() || self.state.suggestions_pending
    }

    /// Drain both service channels. Returns `true` if any message was applied.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;

        while let Some(msg) = self.services.try_recv_weather_message() {
            changed = true;
            let action = match msg {
                WeatherServiceMessage::FetchDone { seq, result } => match result {
                    Ok((location, forecast)) => Action::FetchSucceeded {
                        seq,
                        location,
                        forecast,
                    },
                    Err(error) => Action::FetchFailed { seq, error },
                },
                WeatherServiceMessage::PositionResolved { seq, result } => match result {
                    Ok(location) => Action::GeolocationResolved { seq, location },
                    Err(error) => Action::FetchFailed { seq, error },
                },
            };
            self.dispatch(action);
        }

        while let Some(msg) = self.services.try_recv_suggestion_message() {
            changed = true;
            let SuggestionServiceMessage::SuggestionsDone { seq, result } = msg;
            let action = match result {
                Ok(results) => Action::SuggestionsReceived { seq, results },
                Err(_) => Action::SuggestionsFailed { seq },
            };
            self.dispatch(action);
        }

        changed
    }

    /// Poll until nothing is outstanding or `timeout` elapses.
    ///
    /// Returns `true` if the model settled in time.
    pub fn wait_until_idle(&mut self, timeout: Duration) -> bool {
        // None: the timeout is too large to represent, so wait indefinitely
        let deadline = Instant::now().checked_add(timeout);
        loop {
            self.poll_channel();
            if !self.is_busy() {
                return true;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return false;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        let runtime = self.services.runtime();

        match effect {
            Effect::ResolveAndFetch { seq, query } => {
                let clients = self.services.geocoder().zip(self.services.forecast_provider());
                match clients {
                    Some((geocoder, provider)) => services::request_weather_fetch(
                        self.services.weather_sender(),
                        &runtime,
                        geocoder,
                        provider,
                        seq,
                        query,
                    ),
                    None => self.dispatch(Action::FetchFailed {
                        seq,
                        error: DashboardError::NotInitialized,
                    }),
                }
            }
            Effect::LocateDevice { seq } => {
                let geocoder = self.services.geocoder();
                let positions = self.services.position_provider();
                match geocoder.zip(positions) {
                    Some((geocoder, positions)) => services::request_locate(
                        self.services.weather_sender(),
                        &runtime,
                        geocoder,
                        positions,
                        seq,
                    ),
                    None => self.dispatch(Action::FetchFailed {
                        seq,
                        error: DashboardError::NotInitialized,
                    }),
                }
            }
            Effect::FetchSuggestions { seq, query } => match self.services.geocoder() {
                Some(geocoder) => {
                    let config = self.services.suggestion_config();
                    let request = SuggestionRequest {
                        seq,
                        query,
                        debounce: Duration::from_millis(config.debounce_ms),
                        max_results: config.max_results,
                    };
                    let token = self.services.new_suggestion_cancel_token();
                    services::request_suggestions(
                        self.services.suggestion_sender(),
                        &runtime,
                        geocoder,
                        token,
                        request,
                    );
                }
                None => self.dispatch(Action::SuggestionsFailed { seq }),
            },
            Effect::CancelSuggestions => self.services.cancel_suggestions(),
        }
    }
}
