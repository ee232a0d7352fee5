//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_router;
use super::state::AppState;
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

/// Builder for the invoice HTTP server
///
/// # Example
///
/// ```ignore
/// let state = AppState::from_config(config).await?;
/// ServerBuilder::new(state).serve().await?;
/// ```
pub struct ServerBuilder {
    state: AppState,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Address from `server.bind`
    pub fn bind_addr(&self) -> &str {
        &self.state.config.server.bind
    }

    /// Build the final router
    pub fn build(self) -> Router {
        build_router(self.state)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to `server.bind` from the state's configuration
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.bind_addr()).await?;
        let app = self.build();

        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
