//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table
//! - Start background exporters (metrics)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::routing::{default_dispatcher, ConfigurationError};

/// Error raised before the server starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] ConfigurationError),

    #[error("invalid address `{0}`")]
    Address(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind the configured listener address.
pub async fn bind(config: &AppConfig) -> Result<TcpListener, StartupError> {
    let address = &config.listener.bind_address;
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })
}

/// Build the server for `config` and serve on `listener` until `shutdown` fires.
///
/// Take the receiver from [`Shutdown::subscribe`](crate::lifecycle::Shutdown::subscribe)
/// before spawning, so a trigger cannot be missed.
pub async fn serve(
    config: &AppConfig,
    listener: TcpListener,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let dispatcher = Arc::new(default_dispatcher()?);
    tracing::info!(routes = dispatcher.len(), "Route table ready");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config, dispatcher);
    server
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}

/// Full startup sequence: bind the configured address, then serve.
pub async fn run(
    config: AppConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let listener = bind(&config).await?;
    serve(&config, listener, shutdown).await
}
