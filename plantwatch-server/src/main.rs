//! Plantwatch Server - REST API for invasive plant reports
//!
//! - POST /reports - Submit a photo and coordinates
//! - GET /markers - Active invasive sightings for the map
//! - GET /docs - Swagger UI

use plantwatch_server::{create_router_with_config, AppState, Config};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("plantwatch_server=info,plantwatch_core=info,tower_http=info")
        }))
        .init();

    let config = Config::from_env();
    let state = AppState::from_config(&config).await?;
    tracing::info!(?state, "Application state ready");

    let app = create_router_with_config(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Plantwatch API listening (Swagger UI at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
