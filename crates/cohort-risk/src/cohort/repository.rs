use serde::Serialize;

use crate::risk::{RiskAssessment, StudentId, StudentSnapshot};

/// Stored pairing of a snapshot with the assessment computed from it.
///
/// The profile is always recomputed from the snapshot it sits beside, so the two never drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub snapshot: StudentSnapshot,
    pub profile: RiskAssessment,
}

impl StudentRecord {
    pub fn student_id(&self) -> StudentId {
        self.snapshot.student_id
    }
}

/// Storage abstraction so the cohort service can be exercised in isolation.
pub trait SnapshotRepository: Send + Sync {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, RepositoryError>;
    fn update(&self, record: StudentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: StudentId) -> Result<Option<StudentRecord>, RepositoryError>;
    /// All records in ascending id order.
    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError>;
    fn clear(&self) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
