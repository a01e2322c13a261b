use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

pub use crate::{
    configs::{ApiConfig, ObservabilityConfig, SunriseConfig},
    env::{envy_load, FromEnv},
};

pub mod configs;
mod env;
#[cfg(test)]
mod test_utils;

/// Complete configuration of the adapter process.
///
/// The JSON representation is flat, so a legacy `config.json` with `server_url`, shard counts
/// and `grpc_server_address` keys is accepted as is.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub da: SunriseConfig,
    #[serde(flatten)]
    pub api: ApiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw).context("malformed JSON config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config file `{}`", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file `{}`", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.da.validate().context("invalid DA client config")
    }
}

impl FromEnv for AppConfig {
    fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            da: SunriseConfig::from_env()?,
            api: ApiConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, time::Duration};

    use super::*;
    use crate::test_utils::TestEnv;

    const LEGACY_CONFIG: &str = r#"{
        "server_url": "http://localhost:8000",
        "data_shard_count": 6,
        "parity_shard_count": 4,
        "grpc_server_address": "127.0.0.1:7980"
    }"#;

    #[test]
    fn legacy_config_is_accepted() {
        let config = AppConfig::from_json(LEGACY_CONFIG).unwrap();
        assert_eq!(config.da.server_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.da.data_shard_count, 6);
        assert_eq!(config.da.parity_shard_count, 4);
        assert_eq!(config.da.protocol, "ipfs");
        assert_eq!(config.da.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.da.max_concurrent_publishes, 16);
        assert_eq!(config.api.bind_address, "127.0.0.1:7980".parse().unwrap());
        assert_eq!(config.observability, ObservabilityConfig::default());
    }

    #[test]
    fn optional_fields_are_parsed() {
        let raw = r#"{
            "server_url": "https://blobs.example.com",
            "data_shard_count": 1,
            "parity_shard_count": 0,
            "protocol": "arweave",
            "request_timeout_ms": 1500,
            "max_concurrent_publishes": 2,
            "bind_address": "0.0.0.0:9000",
            "observability": { "log_format": "json", "log_directives": "sunrise=debug" }
        }"#;
        let config = AppConfig::from_json(raw).unwrap();
        assert_eq!(config.da.protocol, "arweave");
        assert_eq!(config.da.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.da.max_concurrent_publishes, 2);
        assert_eq!(config.api.bind_address.port(), 9000);
        assert_eq!(config.observability.log_format, "json");
        assert_eq!(
            config.observability.log_directives.as_deref(),
            Some("sunrise=debug")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let raw = LEGACY_CONFIG.replace("\"data_shard_count\": 6", "\"data_shard_count\": 0");
        let err = AppConfig::from_json(&raw).unwrap_err();
        assert!(format!("{err:#}").contains("data_shard_count"), "{err:#}");

        let raw = LEGACY_CONFIG.replace("http://localhost:8000", "ftp://localhost:8000");
        let err = AppConfig::from_json(&raw).unwrap_err();
        assert!(format!("{err:#}").contains("scheme"), "{err:#}");

        let raw = LEGACY_CONFIG.replace(
            "\"parity_shard_count\": 4",
            "\"parity_shard_count\": 4, \"max_concurrent_publishes\": 18446744073709551615",
        );
        let err = AppConfig::from_json(&raw).unwrap_err();
        assert!(format!("{err:#}").contains("max_concurrent_publishes"), "{err:#}");

        let raw = r#"{ "server_url": "http://localhost:8000" }"#;
        assert!(AppConfig::from_json(raw).is_err());
    }

    #[test]
    fn config_is_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LEGACY_CONFIG.as_bytes()).unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.da.data_shard_count, 6);

        let err = AppConfig::from_file(Path::new("/non/existing/config.json")).unwrap_err();
        assert!(err.to_string().contains("failed reading config file"));
    }

    #[test]
    fn config_is_loaded_from_env() {
        let _env = TestEnv::set(&[
            ("SUNRISE_DA_SERVER_URL", "http://127.0.0.1:8000"),
            ("SUNRISE_DA_DATA_SHARD_COUNT", "10"),
            ("SUNRISE_DA_PARITY_SHARD_COUNT", "5"),
            ("SUNRISE_DA_MAX_CONCURRENT_PUBLISHES", "4"),
            ("SUNRISE_API_BIND_ADDRESS", "127.0.0.1:7980"),
            ("SUNRISE_LOG_LOG_FORMAT", "json"),
        ]);

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.da.server_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.da.data_shard_count, 10);
        assert_eq!(config.da.parity_shard_count, 5);
        assert_eq!(config.da.max_concurrent_publishes, 4);
        assert_eq!(config.da.protocol, "ipfs");
        assert_eq!(config.api.bind_address.port(), 7980);
        assert_eq!(config.observability.log_format, "json");
    }
}
