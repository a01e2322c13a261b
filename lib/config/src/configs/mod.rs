pub use self::{api::ApiConfig, observability::ObservabilityConfig, sunrise::SunriseConfig};

pub mod api;
pub mod observability;
pub mod sunrise;
