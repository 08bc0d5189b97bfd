//! # Gateway Config
//!
//! Configuration management for the remote chat gateway.
//!
//! All settings come from environment variables, read through the
//! [`EnvSource`] trait so tests can substitute a plain map. Configuration is
//! resolved exactly once at startup and is immutable afterwards.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod gateway;
pub mod provider;

pub use env::{EnvSource, ProcessEnv};
pub use error::ConfigError;
pub use gateway::{
    load_config, CorsOrigins, GatewayConfig, LogFormat, ServerSettings, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
pub use provider::{resolve_provider, DEFAULT_MODEL_NAME, DEFAULT_PROVIDER};
