//! Provider resolution.
//!
//! Picks the backend profile named by `PROVIDER` and builds its
//! [`ProviderConfig`]. Runs once, before the server binds.

use gateway_core::{ProviderConfig, ProviderKind};
use url::Url;

use crate::env::EnvSource;
use crate::error::ConfigError;

/// Provider used when `PROVIDER` is unset
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::Tgi;

/// Model name used when `MODEL_NAME` is unset
pub const DEFAULT_MODEL_NAME: &str = "Intelligent-Internet/II-Search-4B";

/// Resolve the provider profile from the environment.
///
/// A missing API key is not an error here: the backend rejects the call and
/// that rejection is passed through to the caller. Resolution runs before
/// logging is installed, so it emits no events; callers report the outcome.
///
/// # Errors
/// Returns `UnsupportedProvider` for an unknown `PROVIDER` and
/// `InvalidBaseUrl` when the selected provider's base URL is missing or not
/// absolute.
pub fn resolve_provider(env: &impl EnvSource) -> Result<ProviderConfig, ConfigError> {
    let kind = match env.non_empty("PROVIDER") {
        Some(selector) => selector.parse::<ProviderKind>()?,
        None => DEFAULT_PROVIDER,
    };

    let base_key = kind.base_url_env();
    let configured_base = env
        .non_empty(base_key)
        .ok_or_else(|| ConfigError::InvalidBaseUrl {
            key: base_key.to_string(),
            message: "not set".to_string(),
        })?;

    let api_key = env.non_empty(kind.api_key_env());

    let model_name = env
        .non_empty("MODEL_NAME")
        .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());

    let config = ProviderConfig::new(kind, &configured_base, api_key).with_model_name(model_name);
    validate_endpoint(base_key, &config.base_url)?;

    Ok(config)
}

fn validate_endpoint(key: &str, endpoint: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(endpoint).map_err(|e| ConfigError::InvalidBaseUrl {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidBaseUrl {
            key: key.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}
