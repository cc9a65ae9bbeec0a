use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::domain::{
    AssignmentIngest, AttendanceIngest, IngestionEvent, IngestionKind, SubmissionStatus,
    WhatIfRequest,
};
use super::repository::{RepositoryError, SnapshotRepository, StudentRecord};
use super::views::{
    AssignmentIngestion, AtRiskStudent, AttendanceIngestion, CohortStats, ResetSummary,
    StudentDetail, StudentSummary, ValueChange,
};
use crate::config::CohortConfig;
use crate::risk::anomaly::round_to;
use crate::risk::{
    generate_cohort, simulate, RiskAssessment, RiskLevel, StudentId, StudentSnapshot,
    WhatIfResult,
};

pub const DEFAULT_EVENT_LIMIT: usize = 50;
const EVENT_LOG_CAPACITY: usize = 1_000;

/// Service owning the synthetic cohort, its cached risk profiles, and the ingestion log.
///
/// Writes hold the random source for the whole fetch, recompute, update sequence, so two
/// ingestions for the same student never interleave.
pub struct CohortService<R> {
    repository: Arc<R>,
    config: CohortConfig,
    rng: Mutex<StdRng>,
    events: Mutex<VecDeque<IngestionEvent>>,
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Attendance is a percentage; NaN and infinities are rejected along with out-of-range values.
fn check_attendance(field: &str, rate: f64) -> Result<(), CohortServiceError> {
    if rate.is_finite() && (0.0..=100.0).contains(&rate) {
        Ok(())
    } else {
        Err(CohortServiceError::InvalidInput(format!(
            "{field} must be between 0 and 100, got {rate}"
        )))
    }
}

impl<R> CohortService<R>
where
    R: SnapshotRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: CohortConfig) -> Self {
        Self {
            rng: Mutex::new(seeded_rng(config.seed)),
            repository,
            config,
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Generate the configured cohort and store a computed profile for each student.
    pub fn initialize(&self) -> Result<usize, CohortServiceError> {
        let mut rng = lock(&self.rng);
        self.populate(&mut rng)
    }

    fn populate(&self, rng: &mut StdRng) -> Result<usize, CohortServiceError> {
        let snapshots = generate_cohort(self.config.size, rng);
        let loaded = snapshots.len();

        for snapshot in snapshots {
            let profile = RiskAssessment::evaluate(&snapshot, rng);
            self.repository.insert(StudentRecord { snapshot, profile })?;
        }

        let stats = self.stats()?;
        tracing::info!(
            students = loaded,
            high = stats.high_risk,
            moderate = stats.moderate_risk,
            low = stats.low_risk,
            "cohort initialized"
        );
        Ok(loaded)
    }

    pub fn list(&self) -> Result<Vec<StudentSummary>, CohortServiceError> {
        let records = self.repository.list()?;
        Ok(records.iter().map(StudentSummary::from).collect())
    }

    /// Moderate and High students, highest score first.
    pub fn at_risk(&self) -> Result<Vec<AtRiskStudent>, CohortServiceError> {
        let mut flagged: Vec<AtRiskStudent> = self
            .repository
            .list()?
            .iter()
            .filter(|record| record.profile.level.is_at_risk())
            .map(|record| AtRiskStudent {
                summary: StudentSummary::from(record),
                flag_count: record.profile.triggers.len(),
            })
            .collect();

        flagged.sort_by(|a, b| b.summary.risk_score.cmp(&a.summary.risk_score));
        Ok(flagged)
    }

    pub fn detail(&self, id: StudentId) -> Result<StudentDetail, CohortServiceError> {
        let record = self.record(id)?;
        Ok(StudentDetail::from(&record))
    }

    pub fn snapshot(&self, id: StudentId) -> Result<StudentSnapshot, CohortServiceError> {
        Ok(self.record(id)?.snapshot)
    }

    pub fn stats(&self) -> Result<CohortStats, CohortServiceError> {
        let records = self.repository.list()?;
        let total = records.len();
        let count = |level: RiskLevel| {
            records
                .iter()
                .filter(|record| record.profile.level == level)
                .count()
        };

        let (average_risk, average_anomaly) = if total == 0 {
            (0.0, 0.0)
        } else {
            let risk: f64 = records
                .iter()
                .map(|record| f64::from(record.profile.score))
                .sum();
            let anomaly: f64 = records
                .iter()
                .map(|record| record.profile.anomaly_score)
                .sum();
            (
                round_to(risk / total as f64, 1),
                round_to(anomaly / total as f64, 3),
            )
        };

        Ok(CohortStats {
            total_students: total,
            high_risk: count(RiskLevel::High),
            moderate_risk: count(RiskLevel::Moderate),
            low_risk: count(RiskLevel::Low),
            average_risk,
            average_anomaly,
        })
    }

    /// Run a what-if against the stored snapshot. Nothing is written back.
    pub fn simulate(&self, request: &WhatIfRequest) -> Result<WhatIfResult, CohortServiceError> {
        if let Some(target) = request.intervention.target_attendance {
            check_attendance("target_attendance", target)?;
        }
        let snapshot = self.snapshot(request.student_id)?;
        let result = simulate(&snapshot, &request.intervention);
        tracing::debug!(
            student_id = %request.student_id,
            original = result.original_score,
            simulated = result.new_score,
            "what-if simulated"
        );
        Ok(result)
    }

    pub fn ingest_attendance(
        &self,
        request: &AttendanceIngest,
    ) -> Result<AttendanceIngestion, CohortServiceError> {
        let rate = request.attendance_rate;
        check_attendance("attendance_rate", rate)?;

        let mut rng = lock(&self.rng);
        let previous = self.record(request.student_id)?;
        let snapshot = previous
            .snapshot
            .with_previous_attendance(previous.snapshot.attendance_rate)
            .with_attendance(rate);
        let current = self.store(snapshot, &mut rng)?;
        drop(rng);

        let risk_change = self.log_event(IngestionKind::AttendanceUpdate, &previous, &current);

        Ok(AttendanceIngestion {
            student_id: request.student_id,
            previous_attendance: previous.snapshot.attendance_rate,
            new_attendance: current.snapshot.attendance_rate,
            previous_risk_score: previous.profile.score,
            new_risk_score: current.profile.score,
            risk_level: current.profile.level,
            risk_change,
            triggered_rules: current.profile.rule_messages(),
        })
    }

    /// Applies a submission event. The workload baseline stays put so a run of new tasks
    /// accumulates toward the spike rule.
    pub fn ingest_assignment(
        &self,
        request: &AssignmentIngest,
    ) -> Result<AssignmentIngestion, CohortServiceError> {
        let mut rng = lock(&self.rng);
        let previous = self.record(request.student_id)?;
        let before = &previous.snapshot;

        let mut snapshot = match request.status {
            SubmissionStatus::OnTime => before.clone(),
            SubmissionStatus::Late => {
                before.with_late_submissions(before.late_submissions.saturating_add(1))
            }
            SubmissionStatus::Missing => {
                before.with_missed_submissions(before.missed_submissions.saturating_add(1))
            }
        };
        if request.task_count_change != 0 {
            let workload = (i64::from(before.workload_tasks)
                + i64::from(request.task_count_change))
            .clamp(0, i64::from(u32::MAX)) as u32;
            snapshot = snapshot.with_workload(workload);
        }

        let current = self.store(snapshot, &mut rng)?;
        drop(rng);

        let risk_change = self.log_event(IngestionKind::AssignmentSubmission, &previous, &current);
        let after = &current.snapshot;

        Ok(AssignmentIngestion {
            student_id: request.student_id,
            submission_status: request.status,
            late_submissions: ValueChange {
                previous: before.late_submissions,
                current: after.late_submissions,
            },
            missed_submissions: ValueChange {
                previous: before.missed_submissions,
                current: after.missed_submissions,
            },
            workload_tasks: ValueChange {
                previous: before.workload_tasks,
                current: after.workload_tasks,
            },
            previous_risk_score: previous.profile.score,
            new_risk_score: current.profile.score,
            risk_level: current.profile.level,
            risk_change,
            triggered_rules: current.profile.rule_messages(),
        })
    }

    /// Regenerate the cohort from the configured seed and clear the ingestion log.
    pub fn reset(&self) -> Result<ResetSummary, CohortServiceError> {
        let mut rng = lock(&self.rng);
        *rng = seeded_rng(self.config.seed);
        self.repository.clear()?;
        lock(&self.events).clear();

        let students_loaded = self.populate(&mut rng)?;
        drop(rng);

        Ok(ResetSummary {
            students_loaded,
            stats: self.stats()?,
        })
    }

    /// Most recent ingestion events first.
    pub fn events(&self, limit: usize) -> Vec<IngestionEvent> {
        lock(&self.events).iter().take(limit).cloned().collect()
    }

    fn record(&self, id: StudentId) -> Result<StudentRecord, CohortServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(CohortServiceError::UnknownStudent(id))
    }

    fn store(
        &self,
        snapshot: StudentSnapshot,
        rng: &mut StdRng,
    ) -> Result<StudentRecord, CohortServiceError> {
        let profile = RiskAssessment::evaluate(&snapshot, rng);
        let record = StudentRecord { snapshot, profile };
        self.repository.update(record.clone())?;
        Ok(record)
    }

    fn log_event(
        &self,
        kind: IngestionKind,
        previous: &StudentRecord,
        current: &StudentRecord,
    ) -> i16 {
        let risk_change = i16::from(current.profile.score) - i16::from(previous.profile.score);
        let event = IngestionEvent {
            kind,
            student_id: current.student_id(),
            timestamp: Utc::now(),
            risk_change,
        };

        tracing::info!(
            student_id = %event.student_id,
            kind = ?event.kind,
            score = current.profile.score,
            risk_change,
            "ingestion applied"
        );

        let mut events = lock(&self.events);
        events.push_front(event);
        events.truncate(EVENT_LOG_CAPACITY);
        risk_change
    }
}

/// Error raised by the cohort service.
#[derive(Debug, thiserror::Error)]
pub enum CohortServiceError {
    #[error("student {0} not found")]
    UnknownStudent(StudentId),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
