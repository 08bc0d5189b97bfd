//! Configuration errors.

use gateway_core::{GatewayError, UnknownProviderKind};

/// Errors raised while resolving startup configuration.
///
/// All of them are fatal: the gateway refuses to serve traffic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `PROVIDER` names a backend this gateway does not support
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(#[from] UnknownProviderKind),

    /// The provider base URL is missing or not an absolute URL
    #[error("Invalid base URL in {key}: {message}")]
    InvalidBaseUrl {
        /// Environment variable that was read
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// A setting could not be parsed
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Environment variable that was read
        key: String,
        /// What is wrong with it
        message: String,
    },
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}
