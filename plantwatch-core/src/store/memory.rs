//! In-memory report store
//!
//! Used when no database is configured and in tests. Reports are lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::ReportStore;
use crate::error::StoreError;
use crate::report::{Marker, NewReport, Report, ReportId};

#[derive(Default)]
pub struct MemoryReportStore {
    reports: DashMap<ReportId, Report>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Look up a single report by id.
    pub fn get(&self, id: &ReportId) -> Option<Report> {
        self.reports.get(id).map(|entry| entry.value().clone())
    }

    fn collect_where(&self, predicate: impl Fn(&Report) -> bool) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .reports
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn create(&self, report: NewReport) -> Result<Report, StoreError> {
        let report = Report::from_new(Uuid::new_v4(), report, Utc::now());
        self.reports.insert(report.id, report.clone());
        tracing::debug!(report_id = %report.id, "Stored report in memory");
        Ok(report)
    }

    async fn find_by_user(&self, email: &str) -> Result<Vec<Report>, StoreError> {
        Ok(self.collect_where(|r| r.user_email == email))
    }

    async fn find_by_location_and_species(
        &self,
        lat: &str,
        lng: &str,
        plant_name: &str,
    ) -> Result<Vec<Report>, StoreError> {
        Ok(self.collect_where(|r| r.lat == lat && r.lng == lng && r.plant_name == plant_name))
    }

    async fn list_active_invasive_markers(&self) -> Result<Vec<Marker>, StoreError> {
        Ok(self
            .collect_where(Report::is_active_marker)
            .into_iter()
            .filter_map(|r| Marker::from_coordinates(r.plant_name, &r.lat, &r.lng))
            .collect())
    }

    async fn mark_removed(&self, id: ReportId, removed: bool) -> Result<bool, StoreError> {
        match self.reports.get_mut(&id) {
            Some(mut entry) => {
                entry.removed = removed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for MemoryReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryReportStore")
            .field("reports", &self.reports.len())
            .finish()
    }
}
