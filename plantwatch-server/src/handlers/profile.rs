//! User profile handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::UserResponse;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::require_non_blank;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    /// User email
    pub email: Option<String>,
}

/// Get a user profile by email
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Users",
    params(ProfileQuery),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Missing email"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = require_non_blank("email", query.email.as_deref())?;

    let user_repo = state
        .user_repo
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))?;

    let user = user_repo
        .find_by_email(email)
        .await
        .map_err(|e| ApiError::internal(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}
