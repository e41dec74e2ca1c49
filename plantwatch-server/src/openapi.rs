//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3 document served under `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::db::UserResponse;
use crate::handlers::{
    HealthResponse, MarkerLocation, MarkerResponse, ReadyResponse, ReportResponse, ReportSummary,
    UpdateMarkerRequest, UpdateMarkerResponse,
};

/// Plantwatch API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plantwatch API",
        version = "0.1.0",
        description = r#"
## Invasive Plant Sighting Reports

Plantwatch turns a photo and a location into a map report:

1. **Submit** a photo with coordinates via `POST /reports`
2. The photo is identified to a species; non-plants are rejected
3. The species is classified as invasive or not at that location
4. Invasive sightings appear on the map via `GET /markers`

Moderators hide a marker with `PATCH /markers/{id}`.
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Reports", description = "Submit sightings and browse a reporter's history"),
        (name = "Markers", description = "Map markers for active invasive reports and moderation"),
        (name = "Users", description = "Reporter profiles"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::report::create_report_handler,
        crate::handlers::report::list_user_reports_handler,
        crate::handlers::markers::list_markers_handler,
        crate::handlers::markers::lookup_marker_handler,
        crate::handlers::markers::update_marker_handler,
        crate::handlers::profile::get_profile_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            ReportSummary,
            ReportResponse,
            MarkerResponse,
            MarkerLocation,
            UpdateMarkerRequest,
            UpdateMarkerResponse,
            UserResponse,
        )
    )
)]
pub struct ApiDoc;
