//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    #[schema(example = "healthy")]
    pub status: &'static str,
    /// Server version from Cargo.toml
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// Whether report submission is enabled
    pub pipeline_configured: bool,
    /// Whether reports survive a restart
    pub persistent_storage: bool,
    /// Whether the report store answered
    pub storage_available: bool,
    /// Service name
    #[schema(example = "plantwatch-server")]
    pub service: &'static str,
}

/// Service health
///
/// Reports "degraded" when the store is unreachable or submissions are disabled.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_available = match state.reports.check_health().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Report store health check failed");
            false
        }
    };
    let pipeline_configured = state.pipeline.is_some();

    let status = if storage_available && pipeline_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        pipeline_configured,
        persistent_storage: state.reports.is_persistent(),
        storage_available,
        service: "plantwatch-server",
    })
}

/// Readiness response
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service is ready to accept traffic
    pub ready: bool,
    /// Optional message explaining status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse)
    )
)]
pub async fn ready() -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: true,
        message: None,
    })
}
