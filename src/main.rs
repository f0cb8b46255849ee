//! Draw Algorithms API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │              DRAW ALGORITHMS               │
//!   Client Request   │  ┌─────────┐    ┌──────────┐    ┌────────┐ │
//!   ─────────────────┼─▶│  http   │───▶│ routing  │───▶│handler │ │
//!                    │  │ server  │    │dispatcher│    │        │ │
//!                    │  └─────────┘    └────┬─────┘    └───┬────┘ │
//!   Client Response  │  ┌─────────┐         │ no match     │      │
//!   ◀────────────────┼──│response │◀────────┴──────────────┘      │
//!                    │  └─────────┘                               │
//!                    │  config · observability · lifecycle        │
//!                    └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use draw_algorithms::config::{self, AppConfig};
use draw_algorithms::lifecycle::{signals, startup, Shutdown};
use draw_algorithms::observability::logging;

#[derive(Parser)]
#[command(name = "draw-algorithms")]
#[command(version, about = "Draw Algorithms API server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override observability.log_level
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        config::validate_config(&config).map_err(config::ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "draw-algorithms starting");
    match &cli.config {
        Some(path) => tracing::info!(path = %path.display(), "Configuration file loaded"),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Effective configuration"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    startup::run(config, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
