//! The chat gateway service.
//!
//! Each call is an independent transaction: validate, merge generation
//! parameters, build the provider payload, dispatch once, return the result.
//! Nothing is shared between calls except the read-only backend.

use std::sync::Arc;

use gateway_core::{ChatRequest, GatewayResult, InferenceBackend, ProviderKind};
use serde_json::Value;
use tracing::{debug, instrument};

/// Translates inbound chat requests into backend calls
#[derive(Clone)]
pub struct ChatGateway {
    backend: Arc<dyn InferenceBackend>,
}

impl std::fmt::Debug for ChatGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatGateway")
            .field("provider", &self.backend.kind())
            .finish()
    }
}

impl ChatGateway {
    /// Create a gateway over the given backend
    #[must_use]
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Provider kind requests are dispatched to
    #[must_use]
    pub fn provider(&self) -> ProviderKind {
        self.backend.kind()
    }

    /// Handle one chat request.
    ///
    /// Returns the backend's JSON body unchanged on success. Dropping the
    /// returned future cancels the outbound call.
    ///
    /// # Errors
    /// `InvalidRequest` when `messages` is missing or empty (no outbound call
    /// is made); otherwise whatever the backend call produced.
    #[instrument(skip_all, fields(provider = %self.backend.kind()))]
    pub async fn handle(&self, request: ChatRequest) -> GatewayResult<Value> {
        request.validate()?;

        let params = request.generation_params();
        let dropped = params.dropped_keys();
        if !dropped.is_empty() {
            debug!(keys = ?dropped, "generation_config keys not forwarded to backend");
        }

        let kind = self.backend.kind();
        let payload = kind.build_payload(request.into_messages(), params.sampling_params());

        self.backend.complete(&payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gateway_core::{GatewayError, OutboundPayload};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Records payloads and answers with a fixed result
    struct RecordingBackend {
        payloads: Mutex<Vec<OutboundPayload>>,
        reply: GatewayResult<Value>,
    }

    impl RecordingBackend {
        fn new(reply: GatewayResult<Value>) -> Arc<Self> {
            Arc::new(Self {
                payloads: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.payloads.lock().unwrap().len()
        }

        fn last(&self) -> OutboundPayload {
            self.payloads.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl InferenceBackend for RecordingBackend {
        fn kind(&self) -> ProviderKind {
            ProviderKind::RunpodOpenAi
        }

        async fn complete(&self, payload: &OutboundPayload) -> GatewayResult<Value> {
            self.payloads.lock().unwrap().push(payload.clone());
            self.reply.clone()
        }
    }

    fn hello() -> Vec<Value> {
        vec![json!({"role": "user", "content": "hello"})]
    }

    #[tokio::test]
    async fn test_empty_messages_make_no_call() {
        let backend = RecordingBackend::new(Ok(json!({})));
        let gateway = ChatGateway::new(backend.clone());

        let err = gateway.handle(ChatRequest::new(vec![])).await.unwrap_err();
        assert_eq!(err, GatewayError::invalid_request("messages[] required"));

        let err = gateway.handle(ChatRequest::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest { .. }));

        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_default_sampling_params() {
        let backend = RecordingBackend::new(Ok(json!({"id": "abc"})));
        let gateway = ChatGateway::new(backend.clone());

        let body = gateway.handle(ChatRequest::new(hello())).await.unwrap();

        assert_eq!(body, json!({"id": "abc"}));
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            serde_json::to_value(backend.last()).unwrap(),
            json!({
                "input": {
                    "messages": [{"role": "user", "content": "hello"}],
                    "sampling_params": {"max_tokens": 8192, "temperature": 0.6, "top_p": 0.95}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_partial_override_and_extra_keys() {
        let backend = RecordingBackend::new(Ok(json!({})));
        let gateway = ChatGateway::new(backend.clone());

        let overrides = json!({"temperature": 0.2, "repetition_penalty": 1.1});
        let request = ChatRequest::new(hello()).with_generation_config(overrides.as_object().unwrap().clone());
        gateway.handle(request).await.unwrap();

        assert_eq!(
            serde_json::to_value(&backend.last().input.sampling_params).unwrap(),
            json!({"max_tokens": 8192, "temperature": 0.2, "top_p": 0.95})
        );
    }

    #[tokio::test]
    async fn test_backend_error_passes_through() {
        let backend = RecordingBackend::new(Err(GatewayError::backend(503, "overloaded", None)));
        let gateway = ChatGateway::new(backend);

        let err = gateway.handle(ChatRequest::new(hello())).await.unwrap_err();
        assert_eq!(err, GatewayError::backend(503, "overloaded", None));
    }

    /// Never answers; flips a flag when its in-flight call is dropped
    struct HangingBackend {
        cancelled: Arc<AtomicBool>,
    }

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl InferenceBackend for HangingBackend {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Tgi
        }

        async fn complete(&self, _payload: &OutboundPayload) -> GatewayResult<Value> {
            let _guard = DropFlag(self.cancelled.clone());
            std::future::pending::<()>().await;
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_dropping_call_cancels_backend_request() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let gateway = ChatGateway::new(Arc::new(HangingBackend {
            cancelled: cancelled.clone(),
        }));

        let task = tokio::spawn(async move { gateway.handle(ChatRequest::new(hello())).await });
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!cancelled.load(Ordering::SeqCst));

        task.abort();
        let _ = task.await;
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_debug_shows_provider() {
        let gateway = ChatGateway::new(RecordingBackend::new(Ok(Value::Null)));
        assert!(format!("{gateway:?}").contains("RunpodOpenAi"));
    }
}
