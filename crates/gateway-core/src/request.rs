//! Request types for the gateway.
//!
//! The inbound [`ChatRequest`] is deliberately loose: message objects are kept
//! as opaque JSON so the backend stays the authority on their validity. The
//! only thing the gateway shapes is the sampling parameter block.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.6;

/// Default nucleus sampling threshold
pub const DEFAULT_TOP_P: f64 = 0.95;

/// Default generation length cap
pub const DEFAULT_MAX_TOKENS: u64 = 8192;

/// Keys forwarded to the backend inside `sampling_params`
const FORWARDED_KEYS: [&str; 3] = ["max_tokens", "temperature", "top_p"];

/// Inbound chat request as posted by the browser client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered conversation, `{role, content}` objects passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Value>>,

    /// Partial overrides of the default generation parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Map<String, Value>>,
}

impl ChatRequest {
    /// Create a request with the given messages and no overrides
    #[must_use]
    pub fn new(messages: Vec<Value>) -> Self {
        Self {
            messages: Some(messages),
            generation_config: None,
        }
    }

    /// Attach generation parameter overrides
    #[must_use]
    pub fn with_generation_config(mut self, config: Map<String, Value>) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Validate the request.
    ///
    /// Only the presence of at least one message is checked.
    ///
    /// # Errors
    /// Returns `InvalidRequest` when `messages` is absent or empty
    pub fn validate(&self) -> Result<(), crate::error::GatewayError> {
        match &self.messages {
            Some(messages) if !messages.is_empty() => Ok(()),
            _ => Err(crate::error::GatewayError::invalid_request(
                "messages[] required",
            )),
        }
    }

    /// Merge the caller's overrides over the defaults
    #[must_use]
    pub fn generation_params(&self) -> GenerationParams {
        let mut params = GenerationParams::default();
        if let Some(overrides) = &self.generation_config {
            params.merge(overrides);
        }
        params
    }

    /// Consume the request and return its messages
    #[must_use]
    pub fn into_messages(self) -> Vec<Value> {
        self.messages.unwrap_or_default()
    }
}

/// Generation parameters after merging caller overrides over defaults.
///
/// Built fresh for each call; never shared between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    values: Map<String, Value>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert("temperature".to_string(), Value::from(DEFAULT_TEMPERATURE));
        values.insert("top_p".to_string(), Value::from(DEFAULT_TOP_P));
        values.insert("max_tokens".to_string(), Value::from(DEFAULT_MAX_TOKENS));
        Self { values }
    }
}

impl GenerationParams {
    /// Shallow overlay: each key in `overrides` replaces the current value wholesale
    pub fn merge(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Look up a merged parameter
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys that were merged but are not forwarded to the backend
    #[must_use]
    pub fn dropped_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| !FORWARDED_KEYS.contains(key))
            .collect()
    }

    /// Project the merged parameters onto the forwarded sampling block
    #[must_use]
    pub fn sampling_params(&self) -> SamplingParams {
        let pick = |key: &str| self.values.get(key).cloned().unwrap_or(Value::Null);
        SamplingParams {
            max_tokens: pick("max_tokens"),
            temperature: pick("temperature"),
            top_p: pick("top_p"),
        }
    }
}

/// The `sampling_params` object sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Generation length cap
    pub max_tokens: Value,
    /// Sampling temperature
    pub temperature: Value,
    /// Nucleus sampling threshold
    pub top_p: Value,
}

/// Body of the outbound backend call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundPayload {
    /// Serverless-style input envelope
    pub input: PayloadInput,
}

/// Contents of the `input` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadInput {
    /// Caller messages, unmodified
    pub messages: Vec<Value>,
    /// Forwarded sampling parameters
    pub sampling_params: SamplingParams,
}

impl OutboundPayload {
    /// Wrap messages and sampling parameters in the input envelope
    #[must_use]
    pub fn new(messages: Vec<Value>, sampling_params: SamplingParams) -> Self {
        Self {
            input: PayloadInput {
                messages,
                sampling_params,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_message() -> Value {
        json!({"role": "user", "content": "hello"})
    }

    #[test]
    fn test_validate_rejects_missing_messages() {
        let request: ChatRequest = serde_json::from_value(json!({})).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid request: messages[] required");
    }

    #[test]
    fn test_validate_rejects_empty_messages() {
        let request = ChatRequest::new(vec![]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_opaque_messages() {
        // Message shape is the backend's concern
        let request = ChatRequest::new(vec![json!("not an object")]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_null_fields_deserialize_as_absent() {
        let request: ChatRequest =
            serde_json::from_value(json!({"messages": null, "generation_config": null})).unwrap();
        assert!(request.messages.is_none());
        assert!(request.generation_config.is_none());
    }

    #[test]
    fn test_defaults_without_overrides() {
        let request = ChatRequest::new(vec![user_message()]);
        let sampling = request.generation_params().sampling_params();

        assert_eq!(
            serde_json::to_value(&sampling).unwrap(),
            json!({"max_tokens": 8192, "temperature": 0.6, "top_p": 0.95})
        );
    }

    #[test]
    fn test_partial_override() {
        let overrides = json!({"temperature": 0.2});
        let request = ChatRequest::new(vec![user_message()])
            .with_generation_config(overrides.as_object().unwrap().clone());
        let sampling = request.generation_params().sampling_params();

        assert_eq!(sampling.temperature, json!(0.2));
        assert_eq!(sampling.top_p, json!(0.95));
        assert_eq!(sampling.max_tokens, json!(8192));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut params = GenerationParams::default();
        params.merge(json!({"stop": {"a": 1}}).as_object().unwrap());
        params.merge(json!({"stop": {"b": 2}}).as_object().unwrap());

        assert_eq!(params.get("stop"), Some(&json!({"b": 2})));
    }

    #[test]
    fn test_unknown_keys_are_kept_but_not_forwarded() {
        let overrides = json!({"top_k": 40, "presence_penalty": 0.5, "max_tokens": 256});
        let request = ChatRequest::new(vec![user_message()])
            .with_generation_config(overrides.as_object().unwrap().clone());
        let params = request.generation_params();

        assert_eq!(params.get("top_k"), Some(&json!(40)));
        let mut dropped = params.dropped_keys();
        dropped.sort_unstable();
        assert_eq!(dropped, vec!["presence_penalty", "top_k"]);

        let sampling = serde_json::to_value(params.sampling_params()).unwrap();
        assert_eq!(
            sampling,
            json!({"max_tokens": 256, "temperature": 0.6, "top_p": 0.95})
        );
    }

    #[test]
    fn test_payload_shape() {
        let messages = vec![user_message()];
        let sampling = GenerationParams::default().sampling_params();
        let payload = OutboundPayload::new(messages, sampling);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "input": {
                    "messages": [{"role": "user", "content": "hello"}],
                    "sampling_params": {"max_tokens": 8192, "temperature": 0.6, "top_p": 0.95}
                }
            })
        );
    }
}
