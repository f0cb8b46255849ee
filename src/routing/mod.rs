//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     handlers.rs (default route set)
//!     → router.rs (register, reject duplicates)
//!     → Freeze as Arc<Dispatcher>
//!
//! Incoming request (method, path)
//!     → router.rs (exact lookup)
//!     → handler output, or RouteNotFound
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Exact matching only: no prefixes, no patterns, no trailing-slash folding
//! - Deterministic: same input always matches same route

pub mod handlers;
pub mod router;

use axum::http::Method;

pub use handlers::default_dispatcher;
pub use router::{Dispatcher, Handler, Route};

/// Startup error raised while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("route {method} {path} is already registered")]
    DuplicateRoute { method: Method, path: String },
}

/// No registered route matches the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("route not found")]
pub struct RouteNotFound;
