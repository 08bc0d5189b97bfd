//! Top-level gateway configuration.

use std::time::Duration;

use gateway_core::ProviderConfig;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::ConfigError;
use crate::provider::resolve_provider;

/// Port used when `GATEWAY_PORT` is unset
pub const DEFAULT_PORT: u16 = 8000;

/// Upstream timeout used when `UPSTREAM_TIMEOUT_SECS` is unset
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 600;

/// Request body cap used when `MAX_BODY_BYTES` is unset
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Resolved backend profile
    pub provider: ProviderConfig,
    /// Listener settings
    pub server: ServerSettings,
    /// Origins allowed by CORS
    pub cors: CorsOrigins,
    /// Deadline for one outbound call; `None` waits indefinitely
    pub upstream_timeout: Option<Duration>,
    /// Largest accepted `/chat` body; `None` accepts any size
    pub max_body_bytes: Option<usize>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// How long in-flight requests may run after a shutdown signal
    pub shutdown_grace: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }
}

/// CORS origin policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`)
    Any,
    /// Exactly these origins
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list; a `*` entry allows any origin
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid log format '{other}', expected text or json")),
        }
    }
}

impl GatewayConfig {
    /// Build the configuration from an environment source
    ///
    /// # Errors
    /// Returns the first invalid setting encountered
    pub fn from_env(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let provider = resolve_provider(env)?;

        let server = ServerSettings {
            host: env
                .non_empty("GATEWAY_HOST")
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(env, "GATEWAY_PORT", DEFAULT_PORT)?,
            shutdown_grace: Duration::from_secs(parse_or(
                env,
                "SHUTDOWN_GRACE_SECS",
                DEFAULT_SHUTDOWN_GRACE_SECS,
            )?),
        };

        let cors = env
            .non_empty("ALLOWED_ORIGINS")
            .map_or(CorsOrigins::Any, |raw| CorsOrigins::parse(&raw));

        let timeout_secs = parse_or(env, "UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;
        let upstream_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let body_bytes = parse_or(env, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;
        let max_body_bytes = (body_bytes > 0).then_some(body_bytes);

        let log_format = match env.non_empty("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            provider,
            server,
            cors,
            upstream_timeout,
            max_body_bytes,
            log_level: env
                .non_empty("LOG_LEVEL")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
        })
    }
}

/// Load the configuration from the process environment.
///
/// A `.env` file in the working directory is applied first when present;
/// variables already set in the process take precedence.
///
/// # Errors
/// Returns the first invalid setting encountered
pub fn load_config() -> Result<GatewayConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    GatewayConfig::from_env(&ProcessEnv)
}

fn parse_or<T>(env: &impl EnvSource, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env.non_empty(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}
