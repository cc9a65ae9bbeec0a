//! Stored behavioral cohort: repository contract, service operations, and HTTP routes.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AssignmentIngest, AttendanceIngest, IngestionEvent, IngestionKind, SubmissionStatus,
    WhatIfRequest,
};
pub use repository::{RepositoryError, SnapshotRepository, StudentRecord};
pub use router::{analytics_router, cohort_router};
pub use service::{CohortService, CohortServiceError, DEFAULT_EVENT_LIMIT};
pub use views::{
    AssignmentIngestion, AtRiskStudent, AttendanceIngestion, CohortStats, EventLog,
    ResetSummary, StudentDetail, StudentRoster, StudentSummary, ValueChange,
};
