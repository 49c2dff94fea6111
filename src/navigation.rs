//! Navigation capability boundary
//!
//! The engine never performs navigation itself. Strategies receive a
//! [`Navigator`] handle owned by the host, and the engine re-queries the
//! [`NavigationProvider`] immediately before every dispatch so it never acts
//! on a stale surface.

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("route rejected: {0}")]
    Rejected(String),

    #[error("navigation surface unavailable")]
    Unavailable,
}

/// Host-owned navigation handle passed to strategies during dispatch
pub trait Navigator: Send + Sync {
    /// Navigate to a host-defined route
    fn navigate(&self, route: &str) -> Result<(), NavigationError>;
}

/// Provider of the current navigation context
///
/// `current_context` must reflect the live state of the host UI at the moment
/// of the call. The engine calls it freshly for every readiness check and
/// again right before handing a link to a strategy; implementations must not
/// return cached handles for surfaces that no longer exist.
pub trait NavigationProvider: Send + Sync {
    fn current_context(&self) -> Option<Arc<dyn Navigator>>;
}
