//! Health metric relay (v1)
//!
//! Samples heart rate and today's step count from a local health export and
//! relays them to a dashboard endpoint, on activation and on every
//! background grant.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐   visible    ┌───────────┐
//!   │   signals    │─────────────▶│ Presenter │── authorization ──▶ health store
//!   │ (SIGUSR1)    │              └─────┬─────┘
//!   └──────────────┘                    │ foreground
//!                                       ▼
//!   ┌──────────────┐   grant     ┌──────────────┐  re-arm  ┌──────────────┐
//!   │LocalScheduler│────────────▶│ CycleTrigger │─────────▶│LocalScheduler│
//!   └──────────────┘◀────────────└──────┬───────┘          └──────────────┘
//!          complete(success)            │ run cycle
//!                                       ▼
//!                          ┌─────────────────────────┐
//!                          │ AcquisitionCoordinator  │
//!                          │  ├─ HeartRateReader     │──▶ health store
//!                          │  └─ StepCountReader     │──▶ health store
//!                          └────────────┬────────────┘
//!                                       │ JoinedSample
//!                                       ▼
//!                                ┌────────────┐  POST JSON
//!                                │ HttpRelay  │───────────▶ endpoint
//!                                └────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use health_relay::config::{load_config, ConfigError, RelayAppConfig};
use health_relay::lifecycle::{wait_for_signal, App, Shutdown, Signal};
use health_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "health-relay")]
#[command(about = "Relay heart rate and step count to a dashboard endpoint", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the relay endpoint.
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Run a single foreground cycle and exit.
    #[arg(long)]
    once: bool,
}

fn load(cli: &Cli) -> Result<RelayAppConfig, ConfigError> {
    load_config(cli.config.as_deref(), |config| {
        if let Some(endpoint) = &cli.endpoint {
            config.relay.endpoint = endpoint.clone();
        }
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!("health-relay v0.1.0 starting");

    tracing::info!(
        endpoint = %config.relay.endpoint,
        source = %config.source.path,
        task_id = %config.scheduler.task_id,
        min_interval_secs = config.scheduler.min_interval_secs,
        grant_window_secs = config.scheduler.grant_window_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let app = App::build(&config)?;

    if cli.once {
        let success = app.presenter.on_visible().await.await.unwrap_or(false);
        return Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let shutdown = Shutdown::new();
    let scheduler = app.start(shutdown.subscribe()).await?;

    loop {
        match wait_for_signal().await? {
            Signal::Visible => {
                tracing::info!("Visibility signal received");
                let _ = app.presenter.on_visible().await;
            }
            Signal::Shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    shutdown.trigger();
    if let Err(e) = scheduler.await {
        tracing::error!(error = %e, "Scheduler task failed");
    }

    let last_grant = app.scheduler.last_outcome(&config.scheduler.task_id);
    tracing::info!(last_grant = ?last_grant, "Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
