//! # Remote Chat Gateway
//!
//! Stateless HTTP gateway that relays browser chat requests to a single
//! remote inference backend: a Text Generation Inference server or a RunPod
//! serverless endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Hugging Face TGI backend
//! PROVIDER=HF_TGI HF_API_BASE=https://tgi.example HF_API_KEY=hf_xxx remote-chat-gateway
//!
//! # RunPod serverless backend on a custom port
//! PROVIDER=RUNPOD_OPENAI RUNPOD_API_BASE=https://api.runpod.ai/v2/abc/runsync \
//!     RUNPOD_API_KEY=rp_xxx GATEWAY_PORT=9000 remote-chat-gateway
//! ```

use gateway_config::{load_config, GatewayConfig};
use gateway_server::{AppState, Server, ServerConfig};
use gateway_telemetry::{init_logging, LoggingConfig};
use tracing::{error, info, warn};

/// Application entry point
#[tokio::main]
async fn main() {
    // Logging settings come from the environment, so configuration loads first
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&LoggingConfig::from_gateway(&config)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting remote chat gateway"
    );

    if let Err(e) = run(config).await {
        error!(error = %e, "Application failed");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        provider = %config.provider.kind,
        endpoint = %config.provider.base_url,
        model = %config.provider.model_name,
        host = %config.server.host,
        port = config.server.port,
        max_body_bytes = ?config.max_body_bytes,
        "Configuration loaded"
    );

    if !config.provider.has_api_key() {
        warn!(
            key = config.provider.kind.api_key_env(),
            "API key not set, requests will carry an empty bearer token"
        );
    }

    let state = AppState::from_config(&config)?;
    let server = Server::new(ServerConfig::from(&config.server), state);

    server.run().await?;

    info!("Gateway shut down");
    Ok(())
}
