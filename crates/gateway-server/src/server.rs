//! HTTP server lifecycle.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use gateway_config::ServerSettings;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{routes::create_router, shutdown::shutdown_signal, state::AppState};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// How long in-flight requests may run after shutdown starts
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            shutdown_grace: settings.shutdown_grace,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bind port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the shutdown grace period
    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// `host:port` bind address
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Binding or serving failed
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The serving task panicked or was cancelled
    #[error("Server task failed: {0}")]
    Task(String),
}

/// The gateway HTTP server
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        self.serve(listener, async {
            shutdown_signal().await;
        })
        .await
    }

    /// Serve on an existing listener until `shutdown` resolves.
    ///
    /// After `shutdown` resolves no new connections are accepted and
    /// in-flight requests get the configured grace period before they are
    /// dropped.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let grace = self.config.shutdown_grace;
        let app = create_router(self.state);

        info!(address = %listener.local_addr()?, "Gateway listening");

        let (stop_tx, mut stop_rx) = watch::channel(());
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = stop_rx.changed().await;
        });
        let mut task = tokio::spawn(server.into_future());

        tokio::select! {
            joined = &mut task => return flatten(joined),
            () = shutdown => {}
        }

        info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
        let _ = stop_tx.send(());

        match tokio::time::timeout(grace, &mut task).await {
            Ok(joined) => {
                info!("Server stopped");
                flatten(joined)
            }
            Err(_) => {
                warn!("Grace period elapsed, dropping remaining connections");
                task.abort();
                Ok(())
            }
        }
    }
}

fn flatten(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    match joined {
        Ok(result) => result.map_err(ServerError::from),
        Err(e) => Err(ServerError::Task(e.to_string())),
    }
}
