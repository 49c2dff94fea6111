use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::traits::{LinkStrategy, StrategyError};
use crate::navigation::Navigator;

/// Built-in strategy matching links by path prefix
///
/// Claims URIs whose path (the part after `scheme://authority`) starts with
/// the configured prefix, and navigates to that path verbatim. Covers the
/// common "one route per link path" case without a custom strategy.
pub struct PathPrefixStrategy {
    identifier: String,
    prefix: String,
    priority: i32,
    requires_auth: bool,
}

impl PathPrefixStrategy {
    pub fn new(identifier: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            prefix: prefix.into(),
            priority: 0,
            requires_auth: false,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_auth_required(mut self, required: bool) -> Self {
        self.requires_auth = required;
        self
    }

    /// Path component of a link, e.g. `/profile/42` for `app://host/profile/42`
    fn path_of(uri: &str) -> Option<&str> {
        let rest = match uri.split_once("://") {
            Some((_scheme, rest)) => rest,
            None => return None,
        };
        match rest.find('/') {
            Some(idx) => Some(&rest[idx..]),
            // `app://test` style links with no authority segment
            None => None,
        }
    }

    fn route_of<'u>(&self, uri: &'u str) -> Option<&'u str> {
        // prefer the path; fall back to treating everything after the scheme
        // as the route for authority-less links like `app://test`
        let candidate = Self::path_of(uri).or_else(|| {
            uri.split_once("://").map(|(_, rest)| rest)
        })?;
        let normalized = candidate.strip_prefix('/').unwrap_or(candidate);
        let wanted = self.prefix.strip_prefix('/').unwrap_or(&self.prefix);
        normalized.starts_with(wanted).then_some(candidate)
    }
}

#[async_trait]
impl LinkStrategy for PathPrefixStrategy {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    fn can_handle(&self, uri: &str) -> bool {
        self.route_of(uri).is_some()
    }

    fn extract_data(&self, uri: &str) -> Option<Value> {
        self.route_of(uri).map(|route| json!({ "route": route }))
    }

    async fn handle(
        &self,
        uri: &str,
        navigator: Arc<dyn Navigator>,
        data: Option<Value>,
    ) -> Result<(), StrategyError> {
        let route = data
            .as_ref()
            .and_then(|d| d.get("route"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| self.route_of(uri).map(str::to_owned))
            .ok_or_else(|| StrategyError::InvalidData(format!("no route in link: {uri}")))?;

        navigator.navigate(&route)?;
        Ok(())
    }
}
