//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum service with a single fallback handler
//! - Wire up middleware (tracing spans, request timeout)
//! - Hand every request to the route dispatcher
//! - Optionally serve static assets for unmatched GET/HEAD requests
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::response;
use crate::observability::{metrics, tracing::make_request_span};
use crate::routing::{Dispatcher, RouteNotFound};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub static_files: Option<ServeDir>,
}

/// HTTP server fronting the route dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `dispatcher` with the given configuration.
    pub fn new(config: &AppConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let static_files = config.static_files.root.as_ref().map(|root| {
            tracing::info!(root = %root.display(), "Serving static files");
            ServeDir::new(root).append_index_html_on_directories(false)
        });

        let state = AppState {
            dispatcher,
            static_files,
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Axum does no routing of its own here: everything lands in the fallback,
    /// which consults the dispatcher's route table.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
    }

    /// The assembled service, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                // A closed channel also means shut down
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Match the request against the route table and write the handler output.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let dispatched = state.dispatcher.dispatch(&method, request.uri().path());

    let response = match dispatched {
        Ok(body) => response::text(body),
        Err(not_found) => match &state.static_files {
            Some(dir) if method == Method::GET || method == Method::HEAD => {
                serve_static(dir, request).await
            }
            _ => not_found.into_response(),
        },
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

/// Serve an asset from the static directory.
///
/// Only a full `200 OK` file is passed through. Redirects, conditional and
/// range responses, and misses all collapse into the same empty 404.
async fn serve_static(dir: &ServeDir, request: Request<Body>) -> Response {
    let response = match dir.clone().oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(status = %response.status(), "Static lookup did not yield a file");
        return RouteNotFound.into_response();
    }
    response.map(Body::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::default_dispatcher;
    use axum::http::header;
    use std::path::PathBuf;

    fn server(config: &AppConfig) -> HttpServer {
        HttpServer::new(config, Arc::new(default_dispatcher().unwrap()))
    }

    async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_get_banner() {
        let router = server(&AppConfig::default()).router();
        let (status, content_type, body) = send(router, Method::GET, "/api/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(response::TEXT_PLAIN_UTF_8));
        assert_eq!(body, b"Draw Algorithms");
    }

    #[tokio::test]
    async fn test_query_string_ignored() {
        let router = server(&AppConfig::default()).router();
        let (status, _, body) = send(router, Method::GET, "/api/test?name=bfs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Draw Algorithms");
    }

    #[tokio::test]
    async fn test_other_methods_not_found() {
        let router = server(&AppConfig::default()).router();
        for method in [Method::HEAD, Method::POST, Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS] {
            let (status, content_type, body) = send(router.clone(), method, "/api/test").await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(content_type, None);
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_other_paths_not_found() {
        let router = server(&AppConfig::default()).router();
        for uri in ["/", "/api", "/api/test/", "/api/TEST", "/draw/bfs", "/index.html"] {
            let (status, _, body) = send(router.clone(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
            assert!(body.is_empty());
        }
    }

    fn static_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "draw-algorithms-static-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(root.join("js")).unwrap();
        std::fs::write(root.join("app.js"), "console.log('draw');").unwrap();
        std::fs::write(root.join("js").join("index.html"), "<div id=\"app\"></div>").unwrap();
        root
    }

    async fn send_with_header(
        router: Router,
        uri: &str,
        name: header::HeaderName,
        value: &'static str,
    ) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(name, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_static_files_only_ok_or_not_found() {
        let root = static_root("statuses");
        let mut config = AppConfig::default();
        config.static_files.root = Some(root.clone());
        let router = server(&config).router();

        // Directories are never redirected or expanded to index.html
        for uri in ["/js", "/js/", "/"] {
            let (status, content_type, body) = send(router.clone(), Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
            assert_eq!(content_type, None);
            assert!(body.is_empty());
        }

        let (status, body) =
            send_with_header(router.clone(), "/app.js", header::RANGE, "bytes=1000-2000").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (status, body) =
            send_with_header(router.clone(), "/app.js", header::RANGE, "bytes=0-3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (status, body) = send_with_header(
            router.clone(),
            "/app.js",
            header::IF_MODIFIED_SINCE,
            "Fri, 01 Jan 2100 00:00:00 GMT",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (status, _, body) = send(router, Method::GET, "/js/index.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<div id=\"app\"></div>");

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_static_files_served_when_configured() {
        let root = static_root("served");
        let mut config = AppConfig::default();
        config.static_files.root = Some(root.clone());
        let router = server(&config).router();

        let (status, _, body) = send(router.clone(), Method::GET, "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"console.log('draw');");

        // Registered routes take precedence
        let (status, _, body) = send(router.clone(), Method::GET, "/api/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Draw Algorithms");

        let (status, _, body) = send(router.clone(), Method::GET, "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (status, _, _) = send(router, Method::POST, "/app.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(root).unwrap();
    }
}
