//! OpenAI chat-completion classifier.
//!
//! Sends one system message and one user prompt per species, then hands the
//! first choice's content to [`parse_reply`]. No retries: a failed call is an
//! invalid classification.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{
    build_prompt, parse_reply, ClassificationOutcome, InvasivenessClassifier, SYSTEM_PROMPT,
};
use crate::error::{PlantwatchError, Result};

/// Default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for classification requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the OpenAI classifier.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat-completions endpoint URL.
    pub api_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Refuse plain-HTTP endpoints.
    pub require_https: bool,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            require_https: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Classifier backed by an OpenAI-compatible chat-completion API.
pub struct OpenAiClassifier {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClassifier {
    #[instrument(level = "debug", skip_all, fields(
        api_url = %config.api_url,
        model = %config.model,
        timeout_ms = config.timeout.as_millis() as u64
    ))]
    pub fn with_config(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PlantwatchError::Config("OpenAI API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(config.require_https)
            .build()
            .map_err(|e| {
                warn!(error = %e, "Failed to create HTTP client");
                PlantwatchError::Config(format!("Failed to create HTTP client: {e}"))
            })?;

        debug!("OpenAI classifier created");
        Ok(Self { client, config })
    }

    /// Send the prompt and return the raw text of the first choice.
    ///
    /// `Err` means the service could not be used; the text never contains the
    /// request URL.
    pub async fn complete(&self, prompt: &str) -> std::result::Result<String, String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("classification request failed: {}", e.without_url()))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            return Err(format!("classification service returned status {status}"));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed classification response: {}", e.without_url()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| "classification response has no content".to_string())
    }
}

#[async_trait]
impl InvasivenessClassifier for OpenAiClassifier {
    #[instrument(level = "info", skip(self), fields(source = "openai", model = %self.config.model))]
    async fn classify(&self, species: &str, lat: &str, lng: &str) -> ClassificationOutcome {
        let start = Instant::now();
        let prompt = build_prompt(species, lat, lng);
        let reply = self.complete(&prompt).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let outcome = match reply {
            Ok(text) => parse_reply(&text),
            Err(reason) => ClassificationOutcome::Invalid(reason),
        };

        match &outcome {
            ClassificationOutcome::Classified(result) => {
                info!(
                    is_invasive = result.is_invasive,
                    latency_ms, "Species classified"
                );
            }
            ClassificationOutcome::Invalid(reason) => {
                warn!(reason = %reason, latency_ms, "Classification failed");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: "Is it invasive?",
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Is it invasive?");
    }

    #[test]
    fn test_response_without_content_deserializes() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(body.choices[0].message.content.is_none());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OpenAiClassifier::with_config(OpenAiConfig::new(""));
        assert!(matches!(result, Err(PlantwatchError::Config(_))));
    }
}
