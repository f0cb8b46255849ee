//! Response construction.
//!
//! The dispatcher produces exactly two shapes: a `200 OK` plain-text body or
//! an empty `404 Not Found`. No other headers are added here.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::RouteNotFound;

pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";

/// `200 OK` with `body` as `text/plain`.
pub fn text(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF_8))],
        body,
    )
        .into_response()
}

impl IntoResponse for RouteNotFound {
    fn into_response(self) -> Response {
        StatusCode::NOT_FOUND.into_response()
    }
}
