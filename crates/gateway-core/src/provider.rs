//! Provider abstraction.
//!
//! A provider is a remote inference backend with its own endpoint layout and
//! credentials. The set is closed: adding a backend means adding a
//! [`ProviderKind`] variant and its arms below.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::error::GatewayResult;
use crate::request::{OutboundPayload, SamplingParams};

/// Supported inference backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Hugging Face text-generation-inference endpoint
    Tgi,
    /// RunPod serverless endpoint speaking the OpenAI-compatible worker protocol
    RunpodOpenAi,
}

/// Error returned when parsing an unrecognized provider selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported provider '{0}', expected one of: HF_TGI, RUNPOD_OPENAI")]
pub struct UnknownProviderKind(pub String);

impl std::str::FromStr for ProviderKind {
    type Err = UnknownProviderKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HF_TGI" => Ok(Self::Tgi),
            "RUNPOD_OPENAI" => Ok(Self::RunpodOpenAi),
            other => Err(UnknownProviderKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

impl ProviderKind {
    /// The `PROVIDER` value that selects this kind
    #[must_use]
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Tgi => "HF_TGI",
            Self::RunpodOpenAi => "RUNPOD_OPENAI",
        }
    }

    /// Environment variable holding this provider's base URL
    #[must_use]
    pub fn base_url_env(&self) -> &'static str {
        match self {
            Self::Tgi => "HF_API_BASE",
            Self::RunpodOpenAi => "RUNPOD_API_BASE",
        }
    }

    /// Environment variable holding this provider's API key
    #[must_use]
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Tgi => "HF_API_KEY",
            Self::RunpodOpenAi => "RUNPOD_API_KEY",
        }
    }

    /// Build the outbound URL from a configured base.
    ///
    /// Trailing slashes are stripped before any suffix is appended.
    #[must_use]
    pub fn endpoint(&self, configured_base: &str) -> String {
        let base = configured_base.trim_end_matches('/');
        match self {
            Self::Tgi => format!("{base}/v1"),
            Self::RunpodOpenAi => base.to_string(),
        }
    }

    /// Shape the outbound body for this provider
    #[must_use]
    pub fn build_payload(&self, messages: Vec<Value>, sampling: SamplingParams) -> OutboundPayload {
        match self {
            // Both backends sit behind the same serverless `input` envelope
            Self::Tgi | Self::RunpodOpenAi => OutboundPayload::new(messages, sampling),
        }
    }
}

/// Resolved provider profile, immutable for the life of the process
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which backend this profile targets
    pub kind: ProviderKind,
    /// Absolute outbound URL, without trailing slash
    pub base_url: String,
    /// Bearer token; absent keys are rejected by the backend, not here
    pub api_key: Option<SecretString>,
    /// Model identifier, carried for future dispatch
    pub model_name: String,
}

impl ProviderConfig {
    /// Build a profile from a configured (unsuffixed) base URL
    #[must_use]
    pub fn new(kind: ProviderKind, configured_base: &str, api_key: Option<String>) -> Self {
        Self {
            kind,
            base_url: kind.endpoint(configured_base),
            api_key: api_key.map(SecretString::new),
            model_name: String::new(),
        }
    }

    /// Set the model name
    #[must_use]
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Value of the `Authorization` header sent to the backend
    #[must_use]
    pub fn authorization(&self) -> String {
        let token = self
            .api_key
            .as_ref()
            .map_or("", |key| key.expose_secret().as_str());
        format!("Bearer {token}")
    }

    /// Whether an API key was configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// A backend the gateway can dispatch a chat payload to.
///
/// Implementations return the backend's JSON body on HTTP 200 and a
/// `Backend` or `Transport` error otherwise. They must not retry.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// The provider kind this backend talks to
    fn kind(&self) -> ProviderKind;

    /// Send one payload and return the parsed success body
    async fn complete(&self, payload: &OutboundPayload) -> GatewayResult<Value>;
}
