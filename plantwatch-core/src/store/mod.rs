//! Report persistence.
//!
//! The pipeline only needs [`ReportStore::create`]; the remaining operations
//! serve the read endpoints and moderation. A PostgreSQL implementation lives
//! in the server crate; [`MemoryReportStore`] is the development fallback.

mod memory;

pub use memory::MemoryReportStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::report::{Marker, NewReport, Report, ReportId};

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a new report, assigning its id and creation time.
    async fn create(&self, report: NewReport) -> Result<Report, StoreError>;

    /// All reports submitted by `email`, newest first.
    async fn find_by_user(&self, email: &str) -> Result<Vec<Report>, StoreError>;

    /// Reports at exactly (`lat`, `lng`) for `plant_name`.
    ///
    /// Coordinates are compared as stored strings, not numerically.
    async fn find_by_location_and_species(
        &self,
        lat: &str,
        lng: &str,
        plant_name: &str,
    ) -> Result<Vec<Report>, StoreError>;

    /// Markers for reports that are invasive and not removed.
    async fn list_active_invasive_markers(&self) -> Result<Vec<Marker>, StoreError>;

    /// Set the moderation flag. Returns `false` when no report has `id`.
    async fn mark_removed(&self, id: ReportId, removed: bool) -> Result<bool, StoreError>;

    /// Check backend health (always Ok for in-process stores).
    async fn check_health(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Whether records survive a restart.
    fn is_persistent(&self) -> bool;
}
