//! API error responses.
//!
//! Errors the gateway originates are rendered as `{"detail": "..."}`. Backend
//! errors are passed through with the backend's status, body and content type,
//! never re-wrapped.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gateway_core::GatewayError;
use serde::Serialize;

/// Error returned from HTTP handlers
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Caller-facing message, or the raw backend body for passthrough errors
    pub message: String,
    passthrough: Option<Passthrough>,
}

#[derive(Debug, Clone)]
struct Passthrough {
    content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    /// Create an error the gateway originates
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            passthrough: None,
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 502 Bad Gateway
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// 504 Gateway Timeout
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Whether this error carries a backend response verbatim
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.passthrough.is_some()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = err.status_code();
        match err {
            GatewayError::InvalidRequest { message } => Self::bad_request(message),
            GatewayError::Backend {
                body, content_type, ..
            } => Self {
                status,
                message: body,
                passthrough: Some(Passthrough { content_type }),
            },
            GatewayError::Transport { timed_out: true, .. } => {
                Self::gateway_timeout("Upstream inference backend timed out")
            }
            GatewayError::Transport { .. } => {
                Self::bad_gateway("Upstream inference backend unavailable")
            }
            GatewayError::Configuration { .. } => Self::internal("Gateway is misconfigured"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.passthrough {
            Some(Passthrough { content_type }) => {
                let content_type = content_type
                    .and_then(|value| HeaderValue::from_str(&value).ok())
                    .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
                (self.status, [(header::CONTENT_TYPE, content_type)], self.message).into_response()
            }
            None => (
                self.status,
                Json(ErrorBody {
                    detail: &self.message,
                }),
            )
                .into_response(),
        }
    }
}
