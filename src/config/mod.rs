//! Configuration for linkbox
//!
//! Two layers:
//!
//! 1. [`Settings`] — scalar engine tunables loaded from defaults, an optional
//!    TOML file, and environment variables (highest priority).
//! 2. [`DispatchConfig`] — the full programmatic setup (strategies, link
//!    source, navigation provider, auth observer, hooks) assembled at the
//!    host's composition root via the builder.
//!
//! # Environment variables
//!
//! Settings can be overridden with the pattern `LINKBOX__<section>__<key>`:
//!
//! - `LINKBOX__ENGINE__LINK_TTL_SECS=60`
//! - `LINKBOX__ENGINE__AUTO_READY=false`
//!
//! The settings file defaults to `config/linkbox.toml` and can be pointed
//! elsewhere with `LINKBOX_CONFIG`.

mod models;
mod sources;
mod validation;

pub use models::{DEFAULT_LINK_TTL, DispatchConfig, EngineSettings, Settings};
pub use validation::{ConfigWarning, ValidationError, inspect};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("settings validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl Settings {
    /// Load settings from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = sources::load()?;
        validation::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific path
    ///
    /// Useful for testing with custom settings files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let settings = sources::load_from_sources(path)?;
        validation::validate(&settings)?;
        Ok(settings)
    }
}
