//! Router configuration module
//!
//! Configures all routes, middleware layers, and creates the application router.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    routing::{get, patch},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::{
    create_report_handler, get_profile_handler, health, list_markers_handler,
    list_user_reports_handler, lookup_marker_handler, ready, update_marker_handler,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the application router with default config
pub fn create_router(state: AppState) -> Router {
    create_router_with_config(state, &Config::default())
}

/// Create the application router with custom configuration
pub fn create_router_with_config(state: AppState, config: &Config) -> Router {
    let cors = match &config.allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            tracing::info!("CORS: Restricting to {} origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        }
        _ => {
            tracing::warn!("CORS: Allowing all origins (dev mode)");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let body_limit = RequestBodyLimitLayer::new(config.body_limit_mb * 1024 * 1024);

    let timeout = TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.timeout_secs),
    );

    Router::new()
        .route(
            "/reports",
            get(list_user_reports_handler).post(create_report_handler),
        )
        .route("/markers", get(list_markers_handler))
        .route("/markers/lookup", get(lookup_marker_handler))
        .route("/markers/{id}", patch(update_marker_handler))
        .route("/profile", get(get_profile_handler))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        // The configured limit replaces the extractor default (2 MB).
        .layer(DefaultBodyLimit::disable())
        .layer(body_limit)
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
}
