//! Dashboard-facing response shapes. Field names are camelCase on the wire.

use serde::Serialize;

use super::domain::{IngestionEvent, SubmissionStatus};
use super::repository::StudentRecord;
use crate::risk::{Recommendation, RiskLevel, StudentId, TrendPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: u8,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub anomaly_score: f64,
}

impl From<&StudentRecord> for StudentSummary {
    fn from(record: &StudentRecord) -> Self {
        let snapshot = &record.snapshot;
        Self {
            student_id: snapshot.student_id,
            name: snapshot.name.clone(),
            email: snapshot.email.clone(),
            department: snapshot.department.clone(),
            year: snapshot.year,
            risk_score: record.profile.score,
            risk_level: record.profile.level,
            anomaly_score: record.profile.anomaly_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtRiskStudent {
    #[serde(flatten)]
    pub summary: StudentSummary,
    pub flag_count: usize,
}

/// Everything the student detail page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: u8,
    pub attendance: f64,
    pub late_submissions: u32,
    pub missed_submissions: u32,
    pub workload_tasks: u32,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub anomaly_score: f64,
    pub triggered_rules: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub stress_trend: Vec<TrendPoint>,
}

impl From<&StudentRecord> for StudentDetail {
    fn from(record: &StudentRecord) -> Self {
        let snapshot = &record.snapshot;
        let profile = &record.profile;
        Self {
            student_id: snapshot.student_id,
            name: snapshot.name.clone(),
            email: snapshot.email.clone(),
            department: snapshot.department.clone(),
            year: snapshot.year,
            attendance: snapshot.attendance_rate,
            late_submissions: snapshot.late_submissions,
            missed_submissions: snapshot.missed_submissions,
            workload_tasks: snapshot.workload_tasks,
            risk_score: profile.score,
            risk_level: profile.level,
            anomaly_score: profile.anomaly_score,
            triggered_rules: profile.rule_messages(),
            recommendations: profile.recommendations.clone(),
            stress_trend: profile.trend.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortStats {
    pub total_students: usize,
    pub high_risk: usize,
    pub moderate_risk: usize,
    pub low_risk: usize,
    pub average_risk: f64,
    pub average_anomaly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceIngestion {
    pub student_id: StudentId,
    pub previous_attendance: f64,
    pub new_attendance: f64,
    pub previous_risk_score: u8,
    pub new_risk_score: u8,
    pub risk_level: RiskLevel,
    pub risk_change: i16,
    pub triggered_rules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueChange {
    pub previous: u32,
    pub current: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentIngestion {
    pub student_id: StudentId,
    pub submission_status: SubmissionStatus,
    pub late_submissions: ValueChange,
    pub missed_submissions: ValueChange,
    pub workload_tasks: ValueChange,
    pub previous_risk_score: u8,
    pub new_risk_score: u8,
    pub risk_level: RiskLevel,
    pub risk_change: i16,
    pub triggered_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub students_loaded: usize,
    pub stats: CohortStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLog {
    pub events: Vec<IngestionEvent>,
    pub count: usize,
}

impl From<Vec<IngestionEvent>> for EventLog {
    fn from(events: Vec<IngestionEvent>) -> Self {
        Self {
            count: events.len(),
            events,
        }
    }
}

/// `GET /students` body: the full table plus the header cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRoster {
    pub students: Vec<StudentSummary>,
    pub stats: CohortStats,
}
