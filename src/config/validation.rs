use thiserror::Error;

use super::models::{DispatchConfig, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("engine.link_ttl_secs must be positive")]
    ZeroLinkTtl,
}

/// Non-fatal setup findings, logged as warnings at initialization
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigWarning {
    #[error(
        "strategy '{identifier}' requires auth but no auth observer is configured; \
         its links will pend until expiration"
    )]
    AuthStrategyWithoutObserver { identifier: String },

    #[error("no strategies configured; every received link will be dropped as unmatched")]
    NoStrategies,
}

/// Validate file/env settings
pub fn validate(settings: &Settings) -> Result<(), ValidationError> {
    if settings.engine.link_ttl_secs == 0 {
        return Err(ValidationError::ZeroLinkTtl);
    }
    Ok(())
}

/// Inspect a programmatic setup for non-fatal misconfigurations
pub fn inspect(config: &DispatchConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.strategies.is_empty() {
        warnings.push(ConfigWarning::NoStrategies);
    }

    if config.auth.is_none() {
        for strategy in &config.strategies {
            if strategy.requires_auth() {
                warnings.push(ConfigWarning::AuthStrategyWithoutObserver {
                    identifier: strategy.identifier().to_string(),
                });
            }
        }
    }

    warnings
}
