//! Multipart form parsing helpers
//!
//! Collects the image upload and text fields of a report submission.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::validation::{validate_content_type, validate_file_size};

/// Form field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

/// An uploaded image
#[derive(Debug, Clone)]
pub struct FileField {
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
    /// Original filename from the multipart field (if provided)
    pub file_name: Option<String>,
}

/// Parsed multipart form fields
#[derive(Debug, Default)]
pub struct MultipartFields {
    file: Option<FileField>,
    text_fields: HashMap<String, String>,
}

impl MultipartFields {
    /// Parse all fields from a multipart request
    ///
    /// The [`IMAGE_FIELD`] part has its Content-Type checked and is read in
    /// chunks, failing as soon as it exceeds `max_file_size`. Every other part
    /// is read as text.
    pub async fn parse(multipart: &mut Multipart, max_file_size: usize) -> Result<Self, ApiError> {
        let mut fields = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == IMAGE_FIELD {
                let content_type = field.content_type().map(|s| s.to_string());
                let file_name = field.file_name().map(|s| s.to_string());
                validate_content_type(content_type.as_deref())?;

                // Checked per chunk so an oversized upload is refused before
                // it is fully buffered.
                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read image: {}", e)))?
                {
                    validate_file_size(data.len() + chunk.len(), max_file_size)?;
                    data.extend_from_slice(&chunk);
                }

                fields.file = Some(FileField {
                    data,
                    content_type,
                    file_name,
                });
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field '{}': {}", name, e))
                })?;
                fields.text_fields.insert(name, value);
            }
        }

        Ok(fields)
    }

    /// Take the uploaded image, failing if none was sent.
    pub fn take_file(&mut self) -> Result<FileField, ApiError> {
        self.file.take().ok_or_else(|| {
            ApiError::bad_request(format!(
                "No image provided. Use '{IMAGE_FIELD}' field in multipart form."
            ))
        })
    }

    /// Get a text field value
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.text_fields.get(name).map(|s| s.as_str())
    }
}
