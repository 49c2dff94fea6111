use bon::Builder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthObserver;
use crate::navigation::NavigationProvider;
use crate::observability::DispatchHooks;
use crate::sources::LinkSource;
use crate::strategies::LinkStrategy;

/// Default pending-link expiration window
pub const DEFAULT_LINK_TTL: Duration = Duration::from_secs(300);

/// Top-level file/env settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Engine tunables loadable from `config/linkbox.toml`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// How long a deferred link stays dispatchable, in seconds
    #[serde(default = "default_link_ttl_secs")]
    pub link_ttl_secs: u64,
    /// Treat the first resolvable navigation context as the readiness signal
    #[serde(default = "default_auto_ready")]
    pub auto_ready: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            link_ttl_secs: default_link_ttl_secs(),
            auto_ready: default_auto_ready(),
        }
    }
}

impl EngineSettings {
    pub fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_secs)
    }
}

fn default_link_ttl_secs() -> u64 {
    DEFAULT_LINK_TTL.as_secs()
}

fn default_auto_ready() -> bool {
    true
}

/// Full engine setup, assembled at the host's composition root
///
/// Collaborator capabilities (link source, navigation, auth) cannot come from
/// a file, so this struct is built programmatically; scalar knobs default to
/// the values in [`Settings`] and can be overridden from a loaded settings
/// file via the builder.
#[derive(Builder)]
pub struct DispatchConfig {
    /// Strategies registered before the engine starts; more can be added
    /// later through `register_strategy`
    #[builder(default)]
    pub strategies: Vec<Arc<dyn LinkStrategy>>,

    /// Where initial and live links come from
    pub source: Arc<dyn LinkSource>,

    /// Live navigation surface lookup
    pub navigation: Arc<dyn NavigationProvider>,

    /// Optional auth collaborator; without one, auth-gated links pend until
    /// expiration
    pub auth: Option<Arc<dyn AuthObserver>>,

    /// Pending-link expiration window
    #[builder(default = DEFAULT_LINK_TTL)]
    pub link_ttl: Duration,

    /// Flip app-ready on the first readiness check that finds a resolvable
    /// navigation context
    #[builder(default = true)]
    pub auto_ready: bool,

    /// Optional host log/error callbacks
    #[builder(default)]
    pub hooks: DispatchHooks,
}
