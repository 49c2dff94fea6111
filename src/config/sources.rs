use super::models::Settings;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "LINKBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/linkbox.toml";
const ENV_PREFIX: &str = "LINKBOX";
const ENV_SEPARATOR: &str = "__";

/// Load settings from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables (highest priority)
pub fn load() -> Result<Settings, ConfigError> {
    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load settings from a specific path plus environment overrides
/// Useful for testing with custom settings files
pub fn load_from_sources(config_path: PathBuf) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading settings from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Settings file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // LINKBOX__ENGINE__LINK_TTL_SECS -> engine.link_ttl_secs
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let settings = builder.build()?;
    settings.try_deserialize()
}
