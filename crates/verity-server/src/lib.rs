//! Verity Server
//!
//! HTTP front end for the fact-checking pipeline. Exposes `POST /analyze`
//! for a URL or a block of text and `GET /health` for liveness.

#![warn(missing_docs)]

pub mod capabilities;
pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use verity_pipeline::{Pipeline, PipelineError};
use verity_providers::ProviderError;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// Provider construction failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Pipeline construction failed
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Build the pipeline described by `config`
///
/// Creates blocking HTTP clients; call outside the async runtime.
pub fn build_pipeline(config: &ServerConfig) -> Result<Pipeline, ServerError> {
    let capabilities = capabilities::build_capabilities(&config.providers)?;
    Ok(Pipeline::new(capabilities, config.pipeline_config())?)
}

/// Start the HTTP server
///
/// Serves until Ctrl-C, then drains in-flight requests.
pub async fn start_server(config: ServerConfig, pipeline: Arc<Pipeline>) -> Result<(), ServerError> {
    info!("Starting Verity server");
    info!("Bind address: {}", config.bind_addr());
    info!("Mode: {}", config.mode);

    let state = AppState {
        pipeline,
        mode: config.mode,
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ServerError::from(config::ConfigError::Invalid("bad".to_string()));
        assert_eq!(err.to_string(), "Configuration error: Invalid configuration: bad");
    }
}
