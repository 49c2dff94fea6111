use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::navigation::{NavigationError, Navigator};

/// Strategy execution errors
///
/// These never reach the caller of a dispatch: the engine catches them,
/// reports them through the error hook, and clears the pending slot.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),

    #[error("invalid link data: {0}")]
    InvalidData(String),

    #[error("fatal strategy error: {0}")]
    Fatal(String),
}

/// Link handling strategy
///
/// A strategy claims a class of URIs via `can_handle` and processes them in
/// `handle`. URI parsing is entirely the strategy's concern; the engine treats
/// links as opaque strings.
///
/// Strategies are registered once and are immutable thereafter.
#[async_trait]
pub trait LinkStrategy: Send + Sync {
    /// Diagnostic name used in logs and failure reports; not required to be
    /// unique.
    fn identifier(&self) -> &str;

    /// Matching priority. Higher values are consulted first; ties keep
    /// registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether links claimed by this strategy may only be dispatched while
    /// the user is authenticated.
    fn requires_auth(&self) -> bool {
        false
    }

    /// Whether this strategy claims the given URI.
    fn can_handle(&self, uri: &str) -> bool;

    /// Pull a payload out of the URI at matching time. The payload travels
    /// with the link through deferral and is handed back to `handle`.
    fn extract_data(&self, _uri: &str) -> Option<Value> {
        None
    }

    /// Process a claimed link against a live navigation context.
    async fn handle(
        &self,
        uri: &str,
        navigator: Arc<dyn Navigator>,
        data: Option<Value>,
    ) -> Result<(), StrategyError>;
}
