//! Route table and dispatch.
//!
//! # Responsibilities
//! - Store registered routes keyed by exact (method, path)
//! - Reject duplicate registrations at startup
//! - Look up and invoke the handler for a request, or report no match
//!
//! # Design Decisions
//! - Registration takes `&mut self`, lookups take `&self`: once the table is
//!   shared behind an `Arc` it is read-only and needs no locks
//! - O(1) lookup via HashMap, no pattern matching
//! - Explicit `RouteNotFound` rather than a silent default

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

use crate::routing::{ConfigurationError, RouteNotFound};

/// A registered (method, path) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    method: Method,
    path: String,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Function invoked when a route matches; its output becomes the response body.
pub type Handler = Box<dyn Fn() -> String + Send + Sync>;

/// Exact-match route table, keyed by method then path.
#[derive(Default)]
pub struct Dispatcher {
    routes: HashMap<Method, HashMap<String, Handler>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for the exact `method` + `path` pair.
    ///
    /// A second registration for the same pair fails and leaves the first
    /// handler in place.
    pub fn register<F, S>(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: F,
    ) -> Result<(), ConfigurationError>
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Into<String>,
    {
        let path = path.into();
        let by_path = self.routes.entry(method.clone()).or_default();
        if by_path.contains_key(&path) {
            return Err(ConfigurationError::DuplicateRoute { method, path });
        }

        tracing::info!(method = %method, path = %path, "Route registered");
        by_path.insert(path, Box::new(move || handler().into()));
        Ok(())
    }

    /// Invoke the handler registered for `method` + `path`.
    pub fn dispatch(&self, method: &Method, path: &str) -> Result<String, RouteNotFound> {
        match self.routes.get(method).and_then(|by_path| by_path.get(path)) {
            Some(handler) => {
                tracing::debug!(method = %method, path = %path, "Route matched");
                Ok(handler())
            }
            None => {
                tracing::debug!(method = %method, path = %path, "No route matched");
                Err(RouteNotFound)
            }
        }
    }

    /// The registered routes (unordered).
    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.routes.iter().flat_map(|(method, by_path)| {
            by_path
                .keys()
                .map(move |path| Route::new(method.clone(), path.clone()))
        })
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes().map(|r| r.to_string()).collect::<Vec<_>>())
            .finish()
    }
}
