//! Per-request spans.
//!
//! Every request is wrapped in a span carrying a fresh request ID so that all
//! log lines emitted while serving it can be correlated. The ID stays
//! server-side; it is not echoed back to the client.

use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

/// Generate a unique request ID.
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span factory for `tower_http::trace::TraceLayer::make_span_with`.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %new_request_id(),
        method = %request.method(),
        path = %request.uri().path(),
    )
}
