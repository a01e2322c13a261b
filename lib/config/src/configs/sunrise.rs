use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Configuration of the Sunrise blob service client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SunriseConfig {
    /// Base URL of the blob publishing service.
    pub server_url: Url,
    /// Number of erasure coding data shards requested for every blob.
    pub data_shard_count: u32,
    /// Number of erasure coding parity shards requested for every blob.
    pub parity_shard_count: u32,
    /// Storage backend tag forwarded to the blob service.
    #[serde(default = "SunriseConfig::default_protocol")]
    pub protocol: String,
    #[serde(default = "SunriseConfig::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Upper bound on the publish requests in flight for a single batch.
    #[serde(default = "SunriseConfig::default_max_concurrent_publishes")]
    pub max_concurrent_publishes: usize,
}

impl SunriseConfig {
    /// Largest accepted value of `max_concurrent_publishes`.
    pub const MAX_CONCURRENT_PUBLISHES_LIMIT: usize = 1_024;

    /// Creates a config with default values for all optional fields.
    pub fn for_tests(server_url: Url) -> Self {
        Self {
            server_url,
            data_shard_count: 6,
            parity_shard_count: 4,
            protocol: Self::default_protocol(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            max_concurrent_publishes: Self::default_max_concurrent_publishes(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            matches!(self.server_url.scheme(), "http" | "https"),
            "server_url must use http or https scheme, got `{}`",
            self.server_url.scheme()
        );
        anyhow::ensure!(
            self.data_shard_count > 0,
            "data_shard_count must be positive"
        );
        anyhow::ensure!(
            (1..=Self::MAX_CONCURRENT_PUBLISHES_LIMIT).contains(&self.max_concurrent_publishes),
            "max_concurrent_publishes must be in 1..={}, got {}",
            Self::MAX_CONCURRENT_PUBLISHES_LIMIT,
            self.max_concurrent_publishes
        );
        anyhow::ensure!(self.request_timeout_ms > 0, "request_timeout_ms must be positive");
        Ok(())
    }

    fn default_protocol() -> String {
        "ipfs".to_owned()
    }

    fn default_request_timeout_ms() -> u64 {
        30_000
    }

    fn default_max_concurrent_publishes() -> usize {
        16
    }
}
