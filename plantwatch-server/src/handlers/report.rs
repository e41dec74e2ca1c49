//! Report submission and history handlers

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use plantwatch_core::{Report, ReportSubmission};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::state::AppState;
use crate::validation::{require_non_blank, validate_latitude, validate_longitude};

/// Created report, without the image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Pueraria montana var. lobata")]
    pub plant_name: String,
    #[schema(example = "35.9940")]
    pub lat: String,
    #[schema(example = "-78.8986")]
    pub lng: String,
    /// Whether the species is invasive at this location
    pub invasive_info: bool,
    /// Harmful effects; empty when not invasive
    #[schema(example = "Kudzu is spreading rapidly. It chokes out native trees.")]
    pub description: String,
    pub removed: bool,
    #[schema(value_type = String, example = "2026-04-18T10:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            plant_name: report.plant_name.clone(),
            lat: report.lat.clone(),
            lng: report.lng.clone(),
            invasive_info: report.invasive_info,
            description: report.description.clone(),
            removed: report.removed,
            created_at: report.created_at,
        }
    }
}

/// Full report, image included
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "ranger@example.com")]
    pub user_email: String,
    pub plant_name: String,
    /// Base64-encoded normalized image (JPEG or PNG)
    pub image: String,
    pub lat: String,
    pub lng: String,
    pub description: String,
    pub invasive_info: bool,
    pub removed: bool,
    #[schema(value_type = String, example = "2026-04-18T10:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            image: BASE64.encode(&report.image),
            user_email: report.user_email,
            plant_name: report.plant_name,
            lat: report.lat,
            lng: report.lng,
            description: report.description,
            invasive_info: report.invasive_info,
            removed: report.removed,
            created_at: report.created_at,
        }
    }
}

/// Submit a plant sighting
///
/// Accepts multipart/form-data with:
/// - **image** (required): photo of the plant (max 25MB)
/// - **email** (required): reporter email
/// - **lat**, **lng** (required): coordinates, stored exactly as sent
///
/// The photo is normalized, identified, and classified for invasiveness at the
/// location before anything is stored. Images that are not a recognizable
/// plant are rejected and never stored.
#[utoipa::path(
    post,
    path = "/reports",
    tag = "Reports",
    request_body(
        content_type = "multipart/form-data",
        description = "Plant photo with reporter email and coordinates"
    ),
    responses(
        (status = 201, description = "Report created", body = ReportSummary),
        (status = 400, description = "Missing field, invalid coordinates, unreadable image, or not a plant"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Report could not be stored"),
        (status = 503, description = "Identification services not configured")
    )
)]
pub async fn create_report_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReportSummary>), ApiError> {
    let pipeline = state
        .pipeline
        .clone()
        .ok_or_else(|| ApiError::service_unavailable("Report submission is not configured"))?;

    let mut fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;

    let email = require_non_blank("email", fields.get_text("email"))?.to_string();
    let lat = require_non_blank("lat", fields.get_text("lat"))?.to_string();
    let lng = require_non_blank("lng", fields.get_text("lng"))?.to_string();
    validate_latitude(&lat)?;
    validate_longitude(&lng)?;
    let image = fields.take_file()?;

    tracing::debug!(
        content_type = ?image.content_type,
        file_name = ?image.file_name,
        size = image.data.len(),
        "Received report image"
    );

    let submission = ReportSubmission {
        email,
        lat,
        lng,
        image: image.data,
    };

    // Runs on its own task so a client disconnect does not abort a
    // submission halfway through the remote calls.
    let report = tokio::spawn(async move { pipeline.submit_report(submission).await })
        .await
        .map_err(|e| ApiError::internal(format!("Report task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(ReportSummary::from(&report))))
}

/// Query for a user's reports
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserReportsQuery {
    /// Reporter email
    pub email: Option<String>,
}

/// List a user's reports
///
/// Newest first, images base64-encoded.
#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    params(UserReportsQuery),
    responses(
        (status = 200, description = "Reports of the user", body = Vec<ReportResponse>),
        (status = 400, description = "Missing email"),
        (status = 404, description = "User has no reports")
    )
)]
pub async fn list_user_reports_handler(
    State(state): State<AppState>,
    Query(query): Query<UserReportsQuery>,
) -> Result<Json<Vec<ReportResponse>>, ApiError> {
    let email = require_non_blank("email", query.email.as_deref())?;

    let reports = state.reports.find_by_user(email).await?;
    if reports.is_empty() {
        return Err(ApiError::not_found("No reports found for user"));
    }

    Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
}
