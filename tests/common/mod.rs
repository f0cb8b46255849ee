//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use draw_algorithms::config::AppConfig;
use draw_algorithms::lifecycle::{startup, Shutdown, StartupError};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), StartupError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down in time")
            .expect("server task panicked")
    }
}

/// Start the full server with default configuration.
#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    start_server_with(AppConfig::default()).await
}

/// Start the full server with `config`, ignoring its bind address.
pub async fn start_server_with(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        startup::serve(&config, listener, server_shutdown).await
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// HTTP client without connection pooling so each request is independent.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
