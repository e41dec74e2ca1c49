//! Species identification.
//!
//! An identifier turns image bytes into a best-match species name. Failures of
//! the remote service are not errors here: they come back as
//! [`Identification::NoMatch`] so the pipeline can reject the submission
//! without a transport error ever crossing this boundary.

mod mock;
mod plantnet;

pub use mock::MockIdentifier;
pub use plantnet::{
    extract_best_match, PlantNetConfig, PlantNetIdentifier, DEFAULT_API_URL, DEFAULT_PROJECT,
};

use async_trait::async_trait;

use crate::normalize::NormalizedImage;

/// Outcome of an identification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identification {
    /// Best-match species name.
    Match(String),
    /// No usable match; carries a human-readable explanation.
    NoMatch(String),
}

impl Identification {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// Species name for a match, explanation otherwise.
    pub fn species_or_error(&self) -> &str {
        match self {
            Self::Match(name) | Self::NoMatch(name) => name,
        }
    }
}

/// Identifies the plant species shown in an image.
///
/// Implementations must be thread-safe (`Send + Sync`) and must not panic or
/// return transport errors; everything maps onto [`Identification`].
#[async_trait]
pub trait SpeciesIdentifier: Send + Sync {
    async fn identify(&self, image: &NormalizedImage) -> Identification;
}
