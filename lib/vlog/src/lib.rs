//! This crate contains the observability subsystem.
//! It is responsible for providing a centralized interface for consistent observability configuration.

use anyhow::Context as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::logs::{LogFormat, LogFormatError, Logs};

pub mod logs;

/// Builder for the observability subsystem.
/// Currently capable of configuring logging output.
#[derive(Debug, Default)]
pub struct ObservabilityBuilder {
    logs: Option<Logs>,
}

impl ObservabilityBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logs(mut self, logs: Option<Logs>) -> Self {
        self.logs = logs;
        self
    }

    /// Initializes the observability subsystem. Returns an error if it's already initialized.
    pub fn try_build(self) -> anyhow::Result<()> {
        let logs = self.logs.unwrap_or_default();
        logs.install_panic_hook();

        let global_filter = logs.build_filter();
        let logs_layer = logs.into_layer();

        tracing_subscriber::registry()
            .with(global_filter)
            .with(logs_layer)
            .try_init()
            .context("failed installing global tracer / logger")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_can_be_installed_only_once() {
        let logs = Logs::default().with_log_directives(Some("sunrise=debug".to_owned()));
        ObservabilityBuilder::new()
            .with_logs(Some(logs))
            .try_build()
            .unwrap();
        tracing::info!("observability is initialized");

        let err = ObservabilityBuilder::new().try_build().unwrap_err();
        assert!(err.to_string().contains("failed installing"), "{err}");
    }
}
