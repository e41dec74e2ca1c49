//! Report-ingestion pipeline.
//!
//! Runs a submission through normalize → identify → classify → store. Stages
//! are strictly sequential and nothing is written before the final stage, so
//! an abort at any point leaves no partial record behind.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::classify::{ClassificationOutcome, InvasivenessClassifier};
use crate::error::{PlantwatchError, RejectionCause, Result};
use crate::identify::{Identification, SpeciesIdentifier};
use crate::normalize::normalize;
use crate::report::{NewReport, Report, ReportSubmission};
use crate::store::ReportStore;

/// Progress of a submission through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Normalized,
    Identified,
    Classified,
    Stored,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Normalized => "normalized",
            Self::Identified => "identified",
            Self::Classified => "classified",
            Self::Stored => "stored",
        };
        f.write_str(name)
    }
}

/// Orchestrates report creation over injected collaborators.
///
/// Built once at startup and shared between requests; it holds no mutable
/// state of its own.
#[derive(Clone)]
pub struct ReportPipeline {
    identifier: Arc<dyn SpeciesIdentifier>,
    classifier: Arc<dyn InvasivenessClassifier>,
    store: Arc<dyn ReportStore>,
}

impl ReportPipeline {
    pub fn new(
        identifier: Arc<dyn SpeciesIdentifier>,
        classifier: Arc<dyn InvasivenessClassifier>,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            identifier,
            classifier,
            store,
        }
    }

    /// Store this pipeline writes to.
    pub fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    /// Create a report from a raw submission.
    ///
    /// # Errors
    ///
    /// - [`PlantwatchError::InvalidImage`] when the upload does not decode.
    /// - [`PlantwatchError::NotAPlant`] when identification finds no match or
    ///   the classifier reply cannot be parsed.
    /// - [`PlantwatchError::Store`] when persisting fails.
    #[instrument(level = "info", skip_all, fields(
        user_email = %submission.email,
        lat = %submission.lat,
        lng = %submission.lng,
        image_bytes = submission.image.len()
    ))]
    pub async fn submit_report(&self, submission: ReportSubmission) -> Result<Report> {
        let start = Instant::now();
        let ReportSubmission {
            email,
            lat,
            lng,
            image,
        } = submission;
        debug!(stage = %PipelineStage::Received, "Submission received");

        let image = normalize(image).inspect_err(|e| {
            warn!(stage = %PipelineStage::Received, error = %e, "Rejected upload");
        })?;
        debug!(
            stage = %PipelineStage::Normalized,
            format = ?image.format(),
            reencoded = image.was_reencoded(),
            "Image normalized"
        );

        let plant_name = match self.identifier.identify(&image).await {
            Identification::Match(name) => name,
            Identification::NoMatch(reason) => {
                warn!(stage = %PipelineStage::Normalized, reason = %reason, "No species match");
                return Err(PlantwatchError::NotAPlant(RejectionCause::NoMatch(reason)));
            }
        };
        debug!(stage = %PipelineStage::Identified, plant_name = %plant_name, "Species identified");

        let verdict = match self.classifier.classify(&plant_name, &lat, &lng).await {
            ClassificationOutcome::Classified(verdict) => verdict,
            ClassificationOutcome::Invalid(reason) => {
                warn!(
                    stage = %PipelineStage::Identified,
                    plant_name = %plant_name,
                    reason = %reason,
                    "Classification unusable"
                );
                return Err(PlantwatchError::NotAPlant(
                    RejectionCause::UnparseableClassification(reason),
                ));
            }
        };
        debug!(
            stage = %PipelineStage::Classified,
            is_invasive = verdict.is_invasive,
            "Species classified"
        );

        let report = self
            .store
            .create(NewReport {
                user_email: email,
                plant_name,
                image: image.into_bytes(),
                lat,
                lng,
                description: verdict.detail,
                invasive_info: verdict.is_invasive,
                removed: false,
            })
            .await?;

        info!(
            stage = %PipelineStage::Stored,
            report_id = %report.id,
            plant_name = %report.plant_name,
            invasive = report.invasive_info,
            total_latency_ms = start.elapsed().as_millis() as u64,
            "Report created"
        );

        Ok(report)
    }
}

impl std::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("persistent_store", &self.store.is_persistent())
            .finish_non_exhaustive()
    }
}
