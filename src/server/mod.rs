//! Server lifecycle
//!
//! Binds the listener, serves the router and shuts down gracefully on
//! SIGINT/SIGTERM. Shutdown cancels the root token, which closes every
//! WebSocket subscriber and makes in-flight reads fail fast.

use std::future::IntoFuture;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::types::ServerResult;

/// Run the server until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(&config, shutdown.clone()));
    let router = create_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, subscriber_queue = config.subscriber_queue, "event server listening");

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_signal(shutdown.clone()))
        .into_future();

    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(config.shutdown_timeout).await;
    };

    tokio::select! {
        result = server => {
            result?;
            tracing::info!("server exited properly");
        }
        _ = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout.as_secs(),
                "graceful shutdown timed out, exiting"
            );
        }
    }
    Ok(())
}

/// Resolve on SIGINT or SIGTERM, cancelling `shutdown`
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!(signal = "SIGINT", "received terminate, graceful shutdown");
        }
        _ = terminate => {
            tracing::info!(signal = "SIGTERM", "received terminate, graceful shutdown");
        }
        _ = shutdown.cancelled() => {}
    }

    shutdown.cancel();
}
