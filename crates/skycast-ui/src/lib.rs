//! SkyCast dashboard: reducer-driven state, async service layer and a
//! plain-text renderer.

pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod services;

pub use app_services::AppServices;
pub use models::{Action, DashboardModel, DashboardState, Effect, LoadedForecast, Phase};
pub use render::render;
pub use services::DashboardError;
