use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObservabilityConfig {
    /// Format of the logs: `plain` or `json`.
    #[serde(default = "ObservabilityConfig::default_log_format")]
    pub log_format: String,
    /// `tracing` filter directives. If not set, `RUST_LOG` is used.
    #[serde(default)]
    pub log_directives: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: Self::default_log_format(),
            log_directives: None,
        }
    }
}

impl ObservabilityConfig {
    fn default_log_format() -> String {
        "plain".to_owned()
    }
}
