//! Report records and the values derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned report identifier.
pub type ReportId = Uuid;

/// Raw sighting as received at the pipeline boundary.
#[derive(Debug, Clone)]
pub struct ReportSubmission {
    pub email: String,
    /// Latitude exactly as supplied by the caller.
    pub lat: String,
    /// Longitude exactly as supplied by the caller.
    pub lng: String,
    pub image: Vec<u8>,
}

/// A fully classified report, ready to be persisted.
///
/// `lat`/`lng` are kept as the caller's strings: point lookups compare them
/// by string equality.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub user_email: String,
    pub plant_name: String,
    pub image: Vec<u8>,
    pub lat: String,
    pub lng: String,
    pub description: String,
    pub invasive_info: bool,
    pub removed: bool,
}

/// A persisted report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub user_email: String,
    pub plant_name: String,
    pub image: Vec<u8>,
    pub lat: String,
    pub lng: String,
    pub description: String,
    pub invasive_info: bool,
    pub removed: bool,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn from_new(id: ReportId, report: NewReport, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_email: report.user_email,
            plant_name: report.plant_name,
            image: report.image,
            lat: report.lat,
            lng: report.lng,
            description: report.description,
            invasive_info: report.invasive_info,
            removed: report.removed,
            created_at,
        }
    }

    /// Whether this report shows up as a map marker.
    pub fn is_active_marker(&self) -> bool {
        !self.removed && self.invasive_info
    }
}

/// Map point for an active invasive report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Plant name shown as the marker title.
    pub key: String,
    pub lat: f64,
    pub lng: f64,
}

impl Marker {
    /// Build a marker from stored string coordinates.
    ///
    /// Returns `None` when either coordinate does not parse as a finite number.
    pub fn from_coordinates(key: impl Into<String>, lat: &str, lng: &str) -> Option<Self> {
        let lat: f64 = lat.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
        let lng: f64 = lng.trim().parse().ok().filter(|v: &f64| v.is_finite())?;
        Some(Self {
            key: key.into(),
            lat,
            lng,
        })
    }
}
