//! # Gateway Core
//!
//! Core types, traits, and error handling for the remote chat gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - The inbound chat request and generation parameter merging
//! - The outbound payload sent to inference backends
//! - Provider kinds, the resolved provider configuration, and the backend trait
//! - Error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod provider;
pub mod request;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use provider::{InferenceBackend, ProviderConfig, ProviderKind, UnknownProviderKind};
pub use request::{
    ChatRequest, GenerationParams, OutboundPayload, PayloadInput, SamplingParams,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};
