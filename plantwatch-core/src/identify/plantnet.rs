//! Pl@ntNet identification client.
//!
//! Uses the `POST /v2/identify/{project}` endpoint of <https://my-api.plantnet.org>.
//!
//! The request is a multipart upload, so it is sent exactly once: a retried
//! upload is billed again by the remote service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{Identification, SpeciesIdentifier};
use crate::error::{PlantwatchError, Result};
use crate::normalize::NormalizedImage;

/// Default Pl@ntNet API base URL.
pub const DEFAULT_API_URL: &str = "https://my-api.plantnet.org";

/// Default flora project ("all" searches every referential).
pub const DEFAULT_PROJECT: &str = "all";

/// Default timeout for identification requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Pl@ntNet client.
#[derive(Debug, Clone)]
pub struct PlantNetConfig {
    /// API base URL, without trailing slash.
    pub api_url: String,
    /// API key sent as the `api-key` query parameter.
    pub api_key: String,
    /// Flora project searched by the identification.
    pub project: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Refuse plain-HTTP endpoints.
    pub require_https: bool,
}

impl PlantNetConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    fn identify_url(&self) -> String {
        format!(
            "{}/v2/identify/{}",
            self.api_url.trim_end_matches('/'),
            self.project
        )
    }
}

impl Default for PlantNetConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("PLANTNET_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: String::new(),
            project: DEFAULT_PROJECT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            require_https: true,
        }
    }
}

/// Pl@ntNet species identifier.
pub struct PlantNetIdentifier {
    client: Client,
    config: PlantNetConfig,
}

impl PlantNetIdentifier {
    #[instrument(level = "debug", skip_all, fields(
        api_url = %config.api_url,
        project = %config.project,
        timeout_ms = config.timeout.as_millis() as u64
    ))]
    pub fn with_config(config: PlantNetConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PlantwatchError::Config("Pl@ntNet API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(config.require_https)
            .build()
            .map_err(|e| {
                warn!(error = %e, "Failed to create HTTP client");
                PlantwatchError::Config(format!("Failed to create HTTP client: {e}"))
            })?;

        debug!("Pl@ntNet client created");
        Ok(Self { client, config })
    }

    /// Send the image and return the best-match species, if any.
    ///
    /// `Ok(None)` means the service answered but recognized nothing (a 404
    /// "species not found" or an empty `bestMatch`). `Err` means the service
    /// could not be used: transport failure, unexpected status or a body that
    /// is not JSON. Error text never contains the request URL, which carries
    /// the API key.
    pub async fn best_match(
        &self,
        image: &NormalizedImage,
    ) -> std::result::Result<Option<String>, String> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name())
            .mime_str(image.mime_type())
            .map_err(|e| format!("invalid upload MIME type: {}", e.without_url()))?;
        let form = Form::new().part("images", part);

        let response = self
            .client
            .post(self.config.identify_url())
            .query(&[("api-key", self.config.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("identification request failed: {}", e.without_url()))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(format!("identification service returned status {status}"));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed identification response: {}", e.without_url()))?;

        Ok(extract_best_match(&body))
    }
}

#[async_trait]
impl SpeciesIdentifier for PlantNetIdentifier {
    #[instrument(level = "info", skip_all, fields(
        source = "plantnet",
        image_bytes = image.bytes().len()
    ))]
    async fn identify(&self, image: &NormalizedImage) -> Identification {
        let start = Instant::now();
        let result = self.best_match(image).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Some(species)) => {
                info!(species = %species, latency_ms, "Species identified");
                Identification::Match(species)
            }
            Ok(None) => {
                info!(latency_ms, "No species recognized");
                Identification::NoMatch("no species recognized in the image".into())
            }
            Err(reason) => {
                warn!(reason = %reason, latency_ms, "Identification service failed");
                Identification::NoMatch(reason)
            }
        }
    }
}

/// Pull the species name out of an identification response body.
///
/// `bestMatch` is normally a plain string. When it is a species record, the
/// `species.scientificNameWithoutAuthor` subfield is used, falling back to the
/// raw JSON text of the record. Missing, null or blank values yield `None`.
pub fn extract_best_match(body: &Value) -> Option<String> {
    let best_match = body.get("bestMatch")?;

    match best_match {
        Value::Null => None,
        Value::String(name) => {
            let name = name.trim();
            (!name.is_empty()).then(|| name.to_string())
        }
        Value::Object(record) => record
            .get("species")
            .and_then(|species| species.get("scientificNameWithoutAuthor"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| Some(best_match.to_string())),
        other => Some(other.to_string()),
    }
}
