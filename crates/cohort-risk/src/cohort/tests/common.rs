use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::cohort::repository::{RepositoryError, SnapshotRepository, StudentRecord};
use crate::cohort::service::CohortService;
use crate::config::CohortConfig;
use crate::risk::{RiskAssessment, StudentId, StudentSnapshot};

pub(super) fn snapshot(id: u32) -> StudentSnapshot {
    StudentSnapshot {
        student_id: StudentId(id),
        name: format!("Student {id}"),
        email: format!("student{id}@university.edu"),
        department: "Physics".to_string(),
        year: 2,
        attendance_rate: 92.0,
        late_submissions: 1,
        missed_submissions: 0,
        workload_tasks: 10,
        previous_attendance: 90.0,
        previous_workload: 10,
    }
}

/// Scores 85: low attendance, late work, a doubled workload and one missing assignment.
pub(super) fn struggling(id: u32) -> StudentSnapshot {
    StudentSnapshot {
        attendance_rate: 60.0,
        late_submissions: 3,
        missed_submissions: 1,
        workload_tasks: 20,
        previous_attendance: 80.0,
        previous_workload: 10,
        ..snapshot(id)
    }
}

/// Scores 50: late work and one missing assignment.
pub(super) fn slipping(id: u32) -> StudentSnapshot {
    StudentSnapshot {
        late_submissions: 2,
        missed_submissions: 1,
        ..snapshot(id)
    }
}

pub(super) fn record(snapshot: StudentSnapshot) -> StudentRecord {
    let profile = RiskAssessment::evaluate(&snapshot, &mut StdRng::seed_from_u64(1));
    StudentRecord { snapshot, profile }
}

pub(super) fn config(size: usize) -> CohortConfig {
    CohortConfig {
        size,
        seed: Some(7),
    }
}

/// Service over a repository preloaded with known students instead of a generated cohort.
pub(super) fn service_with(
    snapshots: Vec<StudentSnapshot>,
) -> (CohortService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    for snapshot in snapshots {
        repository
            .insert(record(snapshot))
            .expect("fixture insert succeeds");
    }
    let service = CohortService::new(repository.clone(), config(12));
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<StudentId, StudentRecord>>>,
}

impl SnapshotRepository for MemoryRepository {
    fn insert(&self, record: StudentRecord) -> Result<StudentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.student_id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.student_id(), record.clone());
        Ok(record)
    }

    fn update(&self, record: StudentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.student_id(), record);
        Ok(())
    }

    fn fetch(&self, id: StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .clear();
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SnapshotRepository for UnavailableRepository {
    fn insert(&self, _record: StudentRecord) -> Result<StudentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: StudentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
