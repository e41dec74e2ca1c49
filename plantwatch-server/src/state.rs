//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use plantwatch_core::{
    MemoryReportStore, OpenAiClassifier, PlantNetIdentifier, ReportPipeline, ReportStore,
};

use crate::config::Config;
use crate::db::{PostgresReportStore, UserRepository};

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Report pipeline; `None` when the remote services are not configured
    pub pipeline: Option<Arc<ReportPipeline>>,
    /// Report store backing the read and moderation endpoints
    pub reports: Arc<dyn ReportStore>,
    /// User repository for profiles; requires a database
    pub user_repo: Option<Arc<UserRepository>>,
    /// Maximum accepted image size in bytes
    pub max_file_size: usize,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// Uses PostgreSQL if `DATABASE_URL` is set, otherwise falls back to
    /// in-memory report storage. Report submission is enabled only when both
    /// remote API keys are present.
    pub async fn from_config(config: &Config) -> plantwatch_core::Result<Self> {
        let (reports, user_repo): (Arc<dyn ReportStore>, Option<Arc<UserRepository>>) =
            match &config.database_url {
                Some(url) => {
                    let store = PostgresReportStore::connect(
                        url,
                        config.database_max_connections,
                        config.database_min_connections,
                    )
                    .await?;
                    store.migrate().await?;
                    let users = Arc::new(UserRepository::new(store.pool().clone()));
                    let store: Arc<dyn ReportStore> = Arc::new(store);
                    tracing::info!("Using PostgreSQL report storage");
                    (store, Some(users))
                }
                None => {
                    tracing::warn!(
                        "DATABASE_URL not set, using in-memory storage - reports will be lost on restart!"
                    );
                    let store: Arc<dyn ReportStore> = Arc::new(MemoryReportStore::new());
                    (store, None)
                }
            };

        let pipeline = match (config.plantnet_config(), config.openai_config()) {
            (Some(plantnet), Some(openai)) => {
                let identifier = PlantNetIdentifier::with_config(plantnet)?;
                let classifier = OpenAiClassifier::with_config(openai)?;
                tracing::info!(model = %config.openai_model, "Report pipeline configured");
                Some(Arc::new(ReportPipeline::new(
                    Arc::new(identifier),
                    Arc::new(classifier),
                    reports.clone(),
                )))
            }
            _ => {
                tracing::warn!(
                    "PLANTNET_API_KEY or OPENAI_API_KEY not set, report submission disabled"
                );
                None
            }
        };

        Ok(Self {
            pipeline,
            reports,
            user_repo,
            max_file_size: config.max_file_size(),
        })
    }

    /// State with only a report store: reads work, submissions answer 503.
    pub fn read_only(reports: Arc<dyn ReportStore>) -> Self {
        Self {
            pipeline: None,
            reports,
            user_repo: None,
            max_file_size: crate::validation::DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Attach a pipeline writing to the same store as the read endpoints.
    pub fn with_pipeline(pipeline: ReportPipeline) -> Self {
        Self {
            reports: pipeline.store().clone(),
            pipeline: Some(Arc::new(pipeline)),
            user_repo: None,
            max_file_size: crate::validation::DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pipeline", &self.pipeline.is_some())
            .field("persistent_reports", &self.reports.is_persistent())
            .field("user_repo", &self.user_repo.is_some())
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}
