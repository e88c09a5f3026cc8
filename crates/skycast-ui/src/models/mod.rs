pub mod dashboard_model;
pub mod dashboard_state;

pub use dashboard_model::DashboardModel;
pub use dashboard_state::{Action, DashboardState, Effect, LoadedForecast, Phase, Transition};
