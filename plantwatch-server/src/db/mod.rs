//! Database module for Plantwatch Server
//!
//! PostgreSQL report store and user repository.

pub mod report;
pub mod user;

pub use report::PostgresReportStore;
pub use user::{User, UserRepository, UserResponse};
