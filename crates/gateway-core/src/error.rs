//! Error taxonomy for the gateway.
//!
//! Every failure a chat call can end in maps onto one [`GatewayError`] variant.
//! Only `Configuration` is fatal; the rest are local to a single call.

use http::StatusCode;

/// Result alias used across the gateway crates
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors produced while resolving configuration or serving a chat call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Startup configuration is unusable; the process must not serve traffic
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// The caller sent a request the gateway refuses to forward
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Human-readable reason returned to the caller
        message: String,
    },

    /// The backend answered with a non-200 status
    #[error("Backend returned HTTP {status}")]
    Backend {
        /// Status code reported by the backend
        status: u16,
        /// Raw backend body, lossily decoded as UTF-8
        body: String,
        /// Content type reported by the backend, if any
        content_type: Option<String>,
    },

    /// The outbound call never produced a usable backend response
    #[error("Transport error: {message}")]
    Transport {
        /// Detail for logs; never shown to the caller verbatim
        message: String,
        /// Whether the configured upstream timeout elapsed
        timed_out: bool,
    },
}

impl GatewayError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a backend error from a non-200 response
    pub fn backend(status: u16, body: impl Into<String>, content_type: Option<String>) -> Self {
        Self::Backend {
            status,
            body: body.into(),
            content_type,
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a transport error for an elapsed upstream timeout
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: true,
        }
    }

    /// HTTP status the gateway answers with for this error.
    ///
    /// Backend errors keep the backend's own status; an out-of-range code
    /// falls back to 502.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Transport { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Transport { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Whether the gateway itself originated this error (as opposed to the backend)
    #[must_use]
    pub fn is_gateway_originated(&self) -> bool {
        !matches!(self, Self::Backend { .. })
    }
}
