//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plantwatch_core::{PlantwatchError, StoreError};
use thiserror::Error;

/// Message shown for both "no species match" and "unreadable classifier reply".
pub const NOT_A_PLANT_MESSAGE: &str = "The uploaded image is not a recognizable plant";

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found - requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable - required service is not configured or available
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error raised by the report pipeline or store
    #[error("Plantwatch error: {0}")]
    Plantwatch(#[from] PlantwatchError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Plantwatch(PlantwatchError::Store(err))
    }
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Plantwatch(ref e) => match e {
                PlantwatchError::InvalidImage(_) | PlantwatchError::NotAPlant(_) => {
                    StatusCode::BAD_REQUEST
                }
                PlantwatchError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
                PlantwatchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Plantwatch(ref e) => match e {
                PlantwatchError::InvalidImage(_) => "INVALID_IMAGE",
                PlantwatchError::NotAPlant(_) => "NOT_A_PLANT",
                PlantwatchError::Config(_) => "SERVICE_UNAVAILABLE",
                PlantwatchError::Store(_) => "STORE_ERROR",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            Self::Plantwatch(ref e) => match e {
                PlantwatchError::InvalidImage(_) => {
                    "The uploaded file is not a readable image".to_string()
                }
                // Both rejection causes share one message; the cause is logged.
                PlantwatchError::NotAPlant(_) => NOT_A_PLANT_MESSAGE.to_string(),
                PlantwatchError::Config(_) => "Report service is not configured".to_string(),
                PlantwatchError::Store(_) => "Failed to store report".to_string(),
            },
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Plantwatch(_) => "plantwatch",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log by severity, always with internal details
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Server error"
            );
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Service unavailable"
            );
        } else {
            tracing::warn!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Client error"
            );
        }

        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_core::RejectionCause;

    #[test]
    fn test_not_a_plant_causes_share_status_and_message() {
        let no_match = ApiError::from(PlantwatchError::NotAPlant(RejectionCause::NoMatch(
            "status 404".into(),
        )));
        let unparseable = ApiError::from(PlantwatchError::NotAPlant(
            RejectionCause::UnparseableClassification("unrecognized leading token".into()),
        ));

        assert_eq!(no_match.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unparseable.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(no_match.error_code(), unparseable.error_code());
        assert_eq!(no_match.client_message(), unparseable.client_message());
        assert_eq!(no_match.client_message(), NOT_A_PLANT_MESSAGE);
    }

    #[test]
    fn test_invalid_image_is_bad_request() {
        let err = ApiError::from(PlantwatchError::InvalidImage("truncated".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_IMAGE");
    }

    #[test]
    fn test_store_error_is_sanitized_500() {
        let err = ApiError::from(StoreError::Query("relation plant_info does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Failed to store report");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::internal("pool exhausted");
        assert_eq!(err.client_message(), "Internal server error");
    }
}
