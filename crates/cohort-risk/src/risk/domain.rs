use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier assigned to a student by the cohort generator or roster import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-band risk classification shared by the behavioral and psychometric engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Behavioral bands: 0-30 Low, 31-60 Moderate, 61-100 High.
    pub const fn from_behavioral_score(score: u8) -> Self {
        if score <= 30 {
            Self::Low
        } else if score <= 60 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Psychometric bands use exclusive upper cutoffs and are kept separate from the
    /// behavioral mapping.
    pub const fn from_psychometric_score(score: u8) -> Self {
        if score < 31 {
            Self::Low
        } else if score < 61 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn is_at_risk(self) -> bool {
        matches!(self, Self::Moderate | Self::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Point-in-time view of a student's tracked behavioral metrics.
///
/// Snapshots are never edited in place. The `with_*` builders return a new value so every
/// risk recomputation sees a complete, consistent state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSnapshot {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub year: u8,
    pub attendance_rate: f64,
    pub late_submissions: u32,
    pub missed_submissions: u32,
    pub workload_tasks: u32,
    pub previous_attendance: f64,
    pub previous_workload: u32,
}

impl StudentSnapshot {
    #[must_use]
    pub fn with_attendance(&self, attendance_rate: f64) -> Self {
        Self {
            attendance_rate,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_previous_attendance(&self, previous_attendance: f64) -> Self {
        Self {
            previous_attendance,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_late_submissions(&self, late_submissions: u32) -> Self {
        Self {
            late_submissions,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_missed_submissions(&self, missed_submissions: u32) -> Self {
        Self {
            missed_submissions,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_workload(&self, workload_tasks: u32) -> Self {
        Self {
            workload_tasks,
            ..self.clone()
        }
    }

    /// Returns the workload change against the previous period as a percentage, or `None`
    /// when there is no previous workload to compare with.
    pub fn workload_increase_pct(&self) -> Option<f64> {
        if self.previous_workload == 0 {
            return None;
        }

        let previous = f64::from(self.previous_workload);
        Some((f64::from(self.workload_tasks) - previous) / previous * 100.0)
    }

    pub fn attendance_drop(&self) -> f64 {
        self.previous_attendance - self.attendance_rate
    }
}

/// Symbolic identity of a behavioral rule so downstream consumers never parse messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    LowAttendance,
    RepeatedLateSubmissions,
    WorkloadSpike,
    MissingSubmissions,
    SuddenAttendanceDrop,
}

impl RuleKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::LowAttendance,
            Self::RepeatedLateSubmissions,
            Self::WorkloadSpike,
            Self::MissingSubmissions,
            Self::SuddenAttendanceDrop,
        ]
    }

    pub const fn weight(self) -> u8 {
        match self {
            Self::LowAttendance => 20,
            Self::RepeatedLateSubmissions => 25,
            Self::WorkloadSpike => 15,
            Self::MissingSubmissions => 25,
            Self::SuddenAttendanceDrop => 15,
        }
    }
}

/// A rule that fired, carrying both its symbolic kind and the rendered explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrigger<K> {
    pub kind: K,
    pub points: u8,
    pub message: String,
}

/// Output of a rule table: capped score plus triggers in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResult<K> {
    pub score: u8,
    pub triggers: Vec<RuleTrigger<K>>,
}

impl<K: Copy + PartialEq> RuleResult<K> {
    pub fn fired(&self, kind: K) -> bool {
        self.triggers.iter().any(|trigger| trigger.kind == kind)
    }

    pub fn kinds(&self) -> Vec<K> {
        self.triggers.iter().map(|trigger| trigger.kind).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.triggers
            .iter()
            .map(|trigger| trigger.message.clone())
            .collect()
    }
}

/// Accumulates triggers and applies the hard 100-point cap on completion.
#[derive(Debug)]
pub(crate) struct RuleTally<K> {
    total: u32,
    triggers: Vec<RuleTrigger<K>>,
}

impl<K> RuleTally<K> {
    pub(crate) fn new() -> Self {
        Self {
            total: 0,
            triggers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, kind: K, points: u8, message: String) {
        self.total += u32::from(points);
        self.triggers.push(RuleTrigger {
            kind,
            points,
            message,
        });
    }

    /// Sums above 100 are truncated rather than rescaled.
    pub(crate) fn finish(self) -> RuleResult<K> {
        RuleResult {
            score: self.total.min(100) as u8,
            triggers: self.triggers,
        }
    }
}
