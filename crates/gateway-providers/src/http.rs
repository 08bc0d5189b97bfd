//! reqwest-based backend.
//!
//! One POST per call, no retries. The client is pooled and shared across
//! requests; it has no cookie store and every header is set per request, so
//! nothing leaks from one call into the next.

use std::time::Duration;

use async_trait::async_trait;
use gateway_core::{
    GatewayError, GatewayResult, InferenceBackend, OutboundPayload, ProviderConfig, ProviderKind,
};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Backend that POSTs payloads to the resolved provider endpoint
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: ProviderConfig,
    authorization: HeaderValue,
    client: Client,
}

impl HttpBackend {
    /// Create a backend with a pooled client.
    ///
    /// `timeout` bounds each outbound call end to end; `None` lets slow
    /// inference run indefinitely.
    ///
    /// # Errors
    /// Returns a configuration error if the HTTP client cannot be built or
    /// the API key is not a valid header value
    pub fn new(config: ProviderConfig, timeout: Option<Duration>) -> GatewayResult<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("remote-chat-gateway/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(32);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| GatewayError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Self::with_client(config, client)
    }

    /// Create a backend around an existing client
    ///
    /// # Errors
    /// Returns a configuration error if the API key is not a valid header value
    pub fn with_client(config: ProviderConfig, client: Client) -> GatewayResult<Self> {
        let mut authorization = HeaderValue::from_str(&config.authorization()).map_err(|_| {
            GatewayError::configuration(format!(
                "{} contains characters not allowed in an HTTP header",
                config.kind.api_key_env()
            ))
        })?;
        authorization.set_sensitive(true);

        Ok(Self {
            config,
            authorization,
            client,
        })
    }

    fn map_send_error(&self, err: &reqwest::Error) -> GatewayError {
        error!(
            provider = %self.config.kind,
            endpoint = %self.config.base_url,
            error = %err,
            timed_out = err.is_timeout(),
            "Backend request failed"
        );

        if err.is_timeout() {
            GatewayError::timeout(format!("Backend did not answer in time: {err}"))
        } else {
            GatewayError::transport(format!("Backend request failed: {err}"))
        }
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    fn kind(&self) -> ProviderKind {
        self.config.kind
    }

    async fn complete(&self, payload: &OutboundPayload) -> GatewayResult<Value> {
        debug!(
            provider = %self.config.kind,
            endpoint = %self.config.base_url,
            messages = payload.input.messages.len(),
            "Sending chat request to backend"
        );

        let response = self
            .client
            .post(&self.config.base_url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();

        if status != StatusCode::OK {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(String::from);
            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(status = %status, error = %e, "Failed to read backend error body");
                    Default::default()
                }
            };
            let body = String::from_utf8_lossy(&bytes).into_owned();

            warn!(
                provider = %self.config.kind,
                status = status.as_u16(),
                body = %body,
                "Backend returned an error"
            );

            return Err(GatewayError::backend(status.as_u16(), body, content_type));
        }

        let bytes = response.bytes().await.map_err(|e| self.map_send_error(&e))?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            error!(provider = %self.config.kind, error = %e, "Backend returned invalid JSON");
            GatewayError::transport(format!("Invalid response JSON: {e}"))
        })?;

        debug!(provider = %self.config.kind, body = %body, "Backend response");

        Ok(body)
    }
}
