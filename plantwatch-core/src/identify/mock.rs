//! Mock identifier for testing and offline development.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Identification, SpeciesIdentifier};
use crate::normalize::NormalizedImage;

/// Identifier that answers every request with a fixed result.
/// WARNING: Do not use in production - it never looks at the image!
pub struct MockIdentifier {
    result: Identification,
    calls: AtomicUsize,
}

impl MockIdentifier {
    pub fn new(result: Identification) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always identify the image as `species`.
    pub fn matching(species: impl Into<String>) -> Self {
        Self::new(Identification::Match(species.into()))
    }

    /// Never find a match.
    pub fn no_match(reason: impl Into<String>) -> Self {
        Self::new(Identification::NoMatch(reason.into()))
    }

    /// Number of identification requests served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeciesIdentifier for MockIdentifier {
    async fn identify(&self, _image: &NormalizedImage) -> Identification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
