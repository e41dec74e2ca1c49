//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod health;
pub mod markers;
pub mod profile;
pub mod report;

pub use crate::state::AppState;
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use markers::{
    list_markers_handler, lookup_marker_handler, update_marker_handler, MarkerLocation,
    MarkerLookupQuery, MarkerResponse, UpdateMarkerRequest, UpdateMarkerResponse,
};
pub use profile::{get_profile_handler, ProfileQuery};
pub use report::{
    create_report_handler, list_user_reports_handler, ReportResponse, ReportSummary,
    UserReportsQuery,
};
