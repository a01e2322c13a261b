use std::{panic, str::FromStr};

use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter, fmt, registry::LookupSpan, EnvFilter, Layer,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log format `{0}`, expected `plain` or `json`")]
pub struct LogFormatError(String);

impl FromStr for LogFormat {
    type Err = LogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(LogFormatError(s.to_owned())),
        }
    }
}

/// Logs layer configuration.
#[derive(Debug, Default)]
pub struct Logs {
    format: LogFormat,
    log_directives: Option<String>,
}

impl From<LogFormat> for Logs {
    fn from(format: LogFormat) -> Self {
        Self {
            format,
            log_directives: None,
        }
    }
}

impl Logs {
    pub fn new(format: &str) -> Result<Self, LogFormatError> {
        Ok(LogFormat::from_str(format)?.into())
    }

    /// Overrides the `RUST_LOG` directives.
    pub fn with_log_directives(mut self, log_directives: Option<String>) -> Self {
        self.log_directives = log_directives;
        self
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub(super) fn install_panic_hook(&self) {
        // Plain logs already get the default panic output, which is readable as is.
        if self.format == LogFormat::Json {
            panic::set_hook(Box::new(|info| {
                tracing::error!(panic = %info, "Panic occurred");
            }));
        }
    }

    pub(super) fn build_filter(&self) -> EnvFilter {
        let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
        match &self.log_directives {
            Some(directives) => builder.parse_lossy(directives),
            None => builder.from_env_lossy(),
        }
    }

    pub(super) fn into_layer<S>(self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        match self.format {
            LogFormat::Plain => fmt::layer().with_target(true).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .flatten_event(true)
                .boxed(),
        }
    }
}
