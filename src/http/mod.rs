//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum/hyper: parse, trace span, timeout)
//!     → routing::Dispatcher (exact method + path lookup)
//!     → [static assets for unmatched GET/HEAD, when configured]
//!     → response.rs (200 text/plain or empty 404)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
