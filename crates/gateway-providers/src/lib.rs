//! # Gateway Providers
//!
//! Backend implementations for the remote chat gateway.
//!
//! Both supported providers (TGI and RunPod) accept the same JSON envelope
//! over a single authenticated POST, so one reqwest-based [`HttpBackend`]
//! serves every [`gateway_core::ProviderKind`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod http;

// Re-export main types
pub use http::HttpBackend;
