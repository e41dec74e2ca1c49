//! Mock classifier for testing and offline development.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{parse_reply, ClassificationOutcome, InvasivenessClassifier};

/// Classifier that feeds a canned model reply through the real parser.
/// WARNING: Do not use in production - the verdict ignores the species!
pub struct MockClassifier {
    reply: String,
    calls: AtomicUsize,
}

impl MockClassifier {
    /// Answer every request as if the model had replied `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of classification requests served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvasivenessClassifier for MockClassifier {
    async fn classify(&self, _species: &str, _lat: &str, _lng: &str) -> ClassificationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_reply(&self.reply)
    }
}
