//! Map marker handlers
//!
//! Markers are the active invasive reports; moderators hide one by flagging
//! its report as removed.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use plantwatch_core::Marker;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::report::ReportResponse;
use crate::state::AppState;
use crate::validation::require_non_blank;

/// Marker position
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkerLocation {
    #[schema(example = 35.994)]
    pub lat: f64,
    pub lng: f64,
}

/// Map marker for an active invasive report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkerResponse {
    /// Plant name
    #[schema(example = "Pueraria montana var. lobata")]
    pub key: String,
    pub location: MarkerLocation,
}

impl From<Marker> for MarkerResponse {
    fn from(marker: Marker) -> Self {
        Self {
            key: marker.key,
            location: MarkerLocation {
                lat: marker.lat,
                lng: marker.lng,
            },
        }
    }
}

/// List active invasive markers
///
/// Reports that are invasive and not removed. An empty map is a normal result.
#[utoipa::path(
    get,
    path = "/markers",
    tag = "Markers",
    responses(
        (status = 200, description = "Active invasive markers", body = Vec<MarkerResponse>)
    )
)]
pub async fn list_markers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MarkerResponse>>, ApiError> {
    let markers = state.reports.list_active_invasive_markers().await?;
    Ok(Json(markers.into_iter().map(MarkerResponse::from).collect()))
}

/// Query for the reports behind a marker
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MarkerLookupQuery {
    /// Latitude, compared as text with the stored value
    pub lat: Option<String>,
    /// Longitude, compared as text with the stored value
    pub lng: Option<String>,
    pub plant_name: Option<String>,
}

/// Reports at a marker
///
/// Coordinates match by exact string equality with what was submitted.
#[utoipa::path(
    get,
    path = "/markers/lookup",
    tag = "Markers",
    params(MarkerLookupQuery),
    responses(
        (status = 200, description = "Reports at the location", body = Vec<ReportResponse>),
        (status = 400, description = "Missing query parameter"),
        (status = 404, description = "No report at this location")
    )
)]
pub async fn lookup_marker_handler(
    State(state): State<AppState>,
    Query(query): Query<MarkerLookupQuery>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let lat = require_non_blank("lat", query.lat.as_deref())?;
    let lng = require_non_blank("lng", query.lng.as_deref())?;
    let plant_name = require_non_blank("plant_name", query.plant_name.as_deref())?;

    let reports = state
        .reports
        .find_by_location_and_species(lat, lng, plant_name)
        .await?;
    if reports.is_empty() {
        return Err(ApiError::not_found("Marker not found"));
    }

    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}

/// Moderation update
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMarkerRequest {
    /// `true` hides the marker, `false` restores it
    pub removed: bool,
}

/// Moderation result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMarkerResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub removed: bool,
    #[schema(example = "Marker updated successfully")]
    pub message: String,
}

/// Flag a report as removed (or restore it)
#[utoipa::path(
    patch,
    path = "/markers/{id}",
    tag = "Markers",
    params(("id" = String, Path, description = "Report id")),
    request_body = UpdateMarkerRequest,
    responses(
        (status = 200, description = "Marker updated", body = UpdateMarkerResponse),
        (status = 400, description = "Malformed id or body"),
        (status = 404, description = "No report with this id")
    )
)]
pub async fn update_marker_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMarkerRequest>,
) -> Result<Json<UpdateMarkerResponse>, ApiError> {
    let updated = state.reports.mark_removed(id, request.removed).await?;
    if !updated {
        return Err(ApiError::not_found(format!("No report with id {id}")));
    }

    tracing::info!(report_id = %id, removed = request.removed, "Marker moderation updated");

    Ok(Json(UpdateMarkerResponse {
        id,
        removed: request.removed,
        message: "Marker updated successfully".to_string(),
    }))
}
