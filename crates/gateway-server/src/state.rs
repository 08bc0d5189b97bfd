//! Shared application state.

use std::sync::Arc;

use gateway_config::{CorsOrigins, GatewayConfig, DEFAULT_MAX_BODY_BYTES};
use gateway_core::{GatewayResult, InferenceBackend};
use gateway_providers::HttpBackend;

use crate::gateway::ChatGateway;

/// State shared by every request handler.
///
/// Read-only after construction; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The chat gateway service
    pub gateway: ChatGateway,
    /// Origins allowed by CORS
    pub cors: Arc<CorsOrigins>,
    /// Largest accepted request body; `None` accepts any size
    pub body_limit: Option<usize>,
}

impl AppState {
    /// Create state around an arbitrary backend, allowing any CORS origin
    /// and the default body limit
    #[must_use]
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            gateway: ChatGateway::new(backend),
            cors: Arc::new(CorsOrigins::Any),
            body_limit: Some(DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Build state from the resolved configuration using the HTTP backend
    ///
    /// # Errors
    /// Returns a configuration error if the HTTP backend cannot be created
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let backend = HttpBackend::new(config.provider.clone(), config.upstream_timeout)?;
        Ok(Self::new(Arc::new(backend))
            .with_cors(config.cors.clone())
            .with_body_limit(config.max_body_bytes))
    }

    /// Set the CORS origin policy
    #[must_use]
    pub fn with_cors(mut self, cors: CorsOrigins) -> Self {
        self.cors = Arc::new(cors);
        self
    }

    /// Set the request body limit
    #[must_use]
    pub fn with_body_limit(mut self, limit: Option<usize>) -> Self {
        self.body_limit = limit;
        self
    }
}
