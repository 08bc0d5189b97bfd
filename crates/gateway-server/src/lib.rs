//! # Gateway Server
//!
//! HTTP server implementation for the remote chat gateway.
//!
//! This crate provides:
//! - The [`ChatGateway`] service: validate, merge, dispatch, map
//! - Axum routes for `POST /chat` and `GET /healthz`
//! - CORS, request IDs, and access logging middleware
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use gateway::ChatGateway;
pub use routes::create_router;
pub use server::{Server, ServerConfig, ServerError};
pub use shutdown::shutdown_signal;
pub use state::AppState;
