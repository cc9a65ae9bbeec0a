use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::{Intervention, StudentId};

/// Attendance reading pushed from the student information system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceIngest {
    pub student_id: StudentId,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    OnTime,
    Late,
    Missing,
}

/// Assignment event pushed from the learning management system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentIngest {
    pub student_id: StudentId,
    pub status: SubmissionStatus,
    /// Signed change to open tasks: positive for new work, negative for completed work.
    #[serde(default)]
    pub task_count_change: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfRequest {
    pub student_id: StudentId,
    #[serde(flatten)]
    pub intervention: Intervention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionKind {
    AttendanceUpdate,
    AssignmentSubmission,
}

/// Entry in the ingestion activity log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionEvent {
    #[serde(rename = "type")]
    pub kind: IngestionKind,
    pub student_id: StudentId,
    pub timestamp: DateTime<Utc>,
    pub risk_change: i16,
}
