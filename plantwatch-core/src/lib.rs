//! Plantwatch Core - invasive plant report ingestion
//!
//! This crate turns a photo of a plant plus a location into a persisted map
//! report:
//!
//! - Image normalization (JPEG/PNG pass-through, everything else re-encoded)
//! - Species identification via Pl@ntNet
//! - Invasiveness classification via a chat-completion model, with a strict
//!   parser for its free-text reply
//! - A storage trait with an in-memory implementation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use plantwatch_core::{
//!     MemoryReportStore, MockClassifier, MockIdentifier, ReportPipeline, ReportSubmission,
//! };
//!
//! # async fn example() -> plantwatch_core::Result<()> {
//! let pipeline = ReportPipeline::new(
//!     Arc::new(MockIdentifier::matching("Pueraria montana")),
//!     Arc::new(MockClassifier::replying("true. Smothers native trees.")),
//!     Arc::new(MemoryReportStore::new()),
//! );
//!
//! let report = pipeline
//!     .submit_report(ReportSubmission {
//!         email: "ranger@example.com".into(),
//!         lat: "35.9940".into(),
//!         lng: "-78.8986".into(),
//!         image: std::fs::read("kudzu.jpg").unwrap(),
//!     })
//!     .await?;
//! assert!(report.invasive_info);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod identify;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;

// Re-export main types for convenience
pub use classify::{
    build_prompt, clean_detail, parse_reply, ClassificationOutcome, ClassificationResult,
    InvasivenessClassifier, MockClassifier, OpenAiClassifier, OpenAiConfig,
};
pub use error::{PlantwatchError, RejectionCause, Result, StoreError};
pub use identify::{
    Identification, MockIdentifier, PlantNetConfig, PlantNetIdentifier, SpeciesIdentifier,
};
pub use normalize::{normalize, NormalizedImage, ACCEPTED_FORMATS};
pub use pipeline::{PipelineStage, ReportPipeline};
pub use report::{Marker, NewReport, Report, ReportId, ReportSubmission};
pub use store::{MemoryReportStore, ReportStore};
