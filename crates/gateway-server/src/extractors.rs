//! Custom Axum extractors for the gateway.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Extract request ID from headers or generate one
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-request-id")
            .or_else(|| parts.headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

        Ok(Self(id))
    }
}

/// JSON body extractor that ignores the request content type.
///
/// Browser clients frequently post JSON as `text/plain` to avoid a CORS
/// preflight, so the body is parsed whatever the header says. Malformed JSON
/// and well-formed JSON of the wrong shape are both 400, with distinct
/// `detail` messages; body read failures keep their own status.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Keeps the rejection's own status, e.g. 413 over the body limit
        let bytes = axum::body::Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::new(
                    rejection.status(),
                    format!("Failed to read request body: {}", rejection.body_text()),
                )
            })?;

        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "Request body rejected");
            if e.is_data() {
                ApiError::bad_request(format!("Invalid request body: {e}"))
            } else {
                ApiError::bad_request(format!("Invalid JSON: {e}"))
            }
        })?;

        Ok(Self(value))
    }
}
