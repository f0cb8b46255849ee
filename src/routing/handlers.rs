//! Application handlers and the route set served by default.

use axum::http::Method;

use crate::routing::{ConfigurationError, Dispatcher};

/// Body returned by the API probe endpoint.
pub const BANNER: &str = "Draw Algorithms";

/// `GET /api/test`
pub fn banner() -> &'static str {
    BANNER
}

/// Build the dispatcher with every route the service exposes.
pub fn default_dispatcher() -> Result<Dispatcher, ConfigurationError> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(Method::GET, "/api/test", banner)?;
    Ok(dispatcher)
}
