use anyhow::Context as _;
use serde::de::DeserializeOwned;

use crate::{ApiConfig, ObservabilityConfig, SunriseConfig};

pub trait FromEnv: Sized {
    fn from_env() -> anyhow::Result<Self>;
}

/// Convenience function that loads the structure from the environment variable given the prefix.
pub fn envy_load<T: DeserializeOwned>(name: &str, prefix: &str) -> anyhow::Result<T> {
    envy::prefixed(prefix)
        .from_env()
        .with_context(|| format!("Cannot load config <{name}>"))
}

impl FromEnv for SunriseConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("sunrise_da", "SUNRISE_DA_")
    }
}

impl FromEnv for ApiConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("api", "SUNRISE_API_")
    }
}

impl FromEnv for ObservabilityConfig {
    fn from_env() -> anyhow::Result<Self> {
        envy_load("observability", "SUNRISE_LOG_")
    }
}
