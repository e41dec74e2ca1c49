//! Invasiveness classification.
//!
//! A classifier asks a remote text model whether a species is invasive at a
//! location and turns the free-text answer into a [`ClassificationResult`].
//! The reply format is an informal contract (a leading `true`/`false` token
//! followed by sentence-separated detail), handled entirely by
//! [`parse_reply`]; callers only ever see [`ClassificationOutcome`].

mod mock;
mod openai;
mod parse;

pub use mock::MockClassifier;
pub use openai::{OpenAiClassifier, OpenAiConfig, DEFAULT_API_URL, DEFAULT_MODEL};
pub use parse::{clean_detail, parse_reply};

use async_trait::async_trait;
use serde::Serialize;

/// System message sent ahead of every classification prompt.
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable bot about plant species.";

/// Parsed invasiveness verdict.
///
/// `detail` is empty whenever `is_invasive` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub is_invasive: bool,
    pub detail: String,
}

impl ClassificationResult {
    pub fn invasive(detail: impl Into<String>) -> Self {
        Self {
            is_invasive: true,
            detail: detail.into(),
        }
    }

    pub fn not_invasive() -> Self {
        Self {
            is_invasive: false,
            detail: String::new(),
        }
    }
}

/// Outcome of a classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Classified(ClassificationResult),
    /// The remote call failed or its reply had no recognizable verdict.
    Invalid(String),
}

/// Decides whether a species is invasive at a location.
///
/// Implementations must not return transport errors: remote failures map onto
/// [`ClassificationOutcome::Invalid`].
#[async_trait]
pub trait InvasivenessClassifier: Send + Sync {
    async fn classify(&self, species: &str, lat: &str, lng: &str) -> ClassificationOutcome;
}

/// Build the user prompt for `species` observed at (`lat`, `lng`).
pub fn build_prompt(species: &str, lat: &str, lng: &str) -> String {
    format!(
        "Is the plant '{species}' an invasive species at latitude {lat}, longitude {lng}? \
         Begin your answer with the single word 'true' or 'false'. \
         If true, follow it with a few sentences describing its harmful effects in that area. \
         If false, answer only 'false'. \
         Do not restate the latitude or longitude in your answer."
    )
}
