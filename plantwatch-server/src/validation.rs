//! Upload validation module
//!
//! Validation utilities for report submissions.

use crate::error::ApiError;

/// Allowed MIME type prefixes for image uploads
const ALLOWED_MIME_PREFIXES: &[&str] = &["image/", "application/octet-stream"];

/// Default max file size in bytes (25 MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Validates the Content-Type of an uploaded image
///
/// Accepts `image/*` and `application/octet-stream`; a missing Content-Type is
/// treated as binary. The bytes themselves are checked later by decoding.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) => {
            let ct_lower = ct.to_lowercase();
            if ALLOWED_MIME_PREFIXES
                .iter()
                .any(|prefix| ct_lower.starts_with(prefix))
            {
                Ok(())
            } else {
                Err(ApiError::bad_request(format!(
                    "Unsupported Content-Type: '{}'. Allowed types: image/*, application/octet-stream",
                    ct
                )))
            }
        }
        None => Ok(()),
    }
}

/// Validates the size of an uploaded image
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), ApiError> {
    if size > max_size {
        let max_mb = max_size / (1024 * 1024);
        let actual_mb = size / (1024 * 1024);
        Err(ApiError::bad_request(format!(
            "File too large: {} MB exceeds maximum of {} MB",
            actual_mb, max_mb
        )))
    } else {
        Ok(())
    }
}

/// Validates a submitted coordinate without altering it.
///
/// The value must parse as a finite number within `[-limit, limit]`. The
/// caller keeps the original string; only its shape is checked here.
pub fn validate_coordinate(name: &str, value: &str, limit: f64) -> Result<(), ApiError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("'{name}' must be a number, got '{value}'")))?;

    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(ApiError::bad_request(format!(
            "'{name}' must be between -{limit} and {limit}, got '{value}'"
        )));
    }
    Ok(())
}

pub fn validate_latitude(value: &str) -> Result<(), ApiError> {
    validate_coordinate("lat", value, 90.0)
}

pub fn validate_longitude(value: &str) -> Result<(), ApiError> {
    validate_coordinate("lng", value, 180.0)
}

/// Validates that a required text value is present and not blank.
///
/// Returns the value untouched.
pub fn require_non_blank<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Missing required field '{name}'"))),
    }
}
