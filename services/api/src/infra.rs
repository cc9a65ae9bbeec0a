use axum::http::HeaderValue;
use cohort_risk::analytics::{dataset, AnalyticsEngine};
use cohort_risk::cohort::{CohortService, RepositoryError, SnapshotRepository, StudentRecord};
use cohort_risk::config::{AnalyticsConfig, CohortConfig, ServerConfig};
use cohort_risk::error::AppError;
use cohort_risk::risk::StudentId;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotRepository {
    records: Arc<Mutex<HashMap<StudentId, StudentRecord>>>,
}

impl SnapshotRepository for InMemorySnapshotRepository {
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
        if guard.contains_key(&record.student_id()) {
            guard.insert(record.student_id(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: StudentId) -> Result<Option<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<StudentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<StudentRecord> = guard.values().cloned().collect();
        records.sort_by_key(StudentRecord::student_id);
        Ok(records)
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .clear();
        Ok(())
    }
}

/// Builds the cohort service over the in-memory store and loads the synthetic cohort.
pub(crate) fn initialized_cohort(
    config: &CohortConfig,
) -> Result<CohortService<InMemorySnapshotRepository>, AppError> {
    let repository = Arc::new(InMemorySnapshotRepository::default());
    let service = CohortService::new(repository, config.clone());
    service.initialize()?;
    Ok(service)
}

/// Loads the survey dataset when one is configured. No classifier is wired in, so fused
/// scores use the dataset's ground-truth labels.
pub(crate) fn load_analytics(config: &AnalyticsConfig) -> Result<Option<AnalyticsEngine>, AppError> {
    let Some(path) = config.dataset.as_ref() else {
        return Ok(None);
    };

    let rows = dataset::from_path(path)?;
    Ok(Some(AnalyticsEngine::load(&rows, None)))
}

pub(crate) fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
