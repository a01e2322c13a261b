use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use sunrise_config::{AppConfig, FromEnv};
use sunrise_da_api::Api;
use sunrise_da_clients::sunrise::SunriseClient;
use sunrise_vlog::{Logs, ObservabilityBuilder};
use tokio::sync::{oneshot, watch};

#[derive(Debug, Parser)]
#[command(author, version, about = "Sunrise DA adapter server")]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Load the config from `SUNRISE_*` environment variables; `--config` is ignored.
    #[arg(long)]
    from_env: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Cli::parse();

    let config = if opt.from_env {
        AppConfig::from_env().context("config from env")?
    } else {
        AppConfig::from_file(&opt.config)?
    };

    let logs = Logs::new(&config.observability.log_format)?
        .with_log_directives(config.observability.log_directives.clone());
    ObservabilityBuilder::new()
        .with_logs(Some(logs))
        .try_build()?;

    let client = SunriseClient::new(config.da.clone()).context("failed creating DA client")?;
    tracing::info!("Using Sunrise blob service at {}", config.da.server_url);
    let api = Api::new(Box::new(client), config.api.bind_address);

    let (stop_sender, stop_receiver) = watch::channel(false);
    let (stop_signal_sender, stop_signal_receiver) = oneshot::channel();
    let mut stop_signal_sender = Some(stop_signal_sender);
    ctrlc::set_handler(move || {
        if let Some(stop_signal_sender) = stop_signal_sender.take() {
            stop_signal_sender.send(()).ok();
        }
    })
    .context("Error setting Ctrl+C handler")?;

    let mut server = tokio::spawn(api.run(stop_receiver));
    tokio::select! {
        result = &mut server => {
            return result.context("DA API server panicked")?;
        }
        _ = stop_signal_receiver => {
            tracing::info!("Stop signal received, shutting down");
        }
    }
    stop_sender.send_replace(true);
    server.await.context("DA API server panicked")??;
    Ok(())
}
