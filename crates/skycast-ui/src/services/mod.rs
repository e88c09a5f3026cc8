pub mod suggestion_service;
pub mod weather_service;

pub use suggestion_service::{request_suggestions, SuggestionRequest, SuggestionServiceMessage};
pub use weather_service::{
    request_fetch as request_weather_fetch, request_locate, DashboardError, WeatherServiceMessage,
};
