//! HTTP request handlers for the gateway API.

use std::time::Instant;

use axum::{extract::State, Json};
use gateway_core::ChatRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError,
    extractors::{JsonBody, RequestId},
    state::AppState,
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` while the process is serving
    pub ok: bool,
    /// Configured provider selector
    pub provider: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        provider: state.gateway.provider().selector().to_string(),
    })
}

/// Chat endpoint.
///
/// Returns the backend's JSON body on success. Backend failures come back
/// with the backend's own status and body.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn chat(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();

    match state.gateway.handle(request).await {
        Ok(body) => {
            info!(
                provider = %state.gateway.provider(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Chat completion relayed"
            );
            Ok(Json(body))
        }
        Err(e) => {
            let status = e.status_code().as_u16();
            if e.is_gateway_originated() && status >= 500 {
                error!(error = %e, status, "Chat request failed");
            } else {
                warn!(error = %e, status, "Chat request rejected");
            }
            Err(e.into())
        }
    }
}
