use super::anomaly::round_to;
use super::domain::{RiskLevel, RuleKind, RuleResult, StudentSnapshot};
use super::rules::compute_risk;
use serde::{Deserialize, Serialize};

pub const FIXED_ATTENDANCE: f64 = 90.0;
pub const FIXED_WORKLOAD: u32 = 10;

const NO_CHANGES: &str = "No changes applied";
const STABLE: &str = "Risk profile stable: adjusted values do not change any triggered rules";

/// Hypothetical changes requested by an advisor.
///
/// Explicit targets take precedence over the boolean fix flags; anything left unset passes
/// through from the stored snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(default)]
    pub fix_attendance: bool,
    #[serde(default)]
    pub fix_workload: bool,
    #[serde(default)]
    pub target_attendance: Option<f64>,
    #[serde(default)]
    pub target_workload: Option<u32>,
    #[serde(default)]
    pub target_late_submissions: Option<u32>,
    #[serde(default)]
    pub target_missed_submissions: Option<u32>,
}

impl Intervention {
    pub fn resolve(&self) -> AppliedIntervention {
        let attendance = self
            .target_attendance
            .or(self.fix_attendance.then_some(FIXED_ATTENDANCE));
        let workload_tasks = self
            .target_workload
            .or(self.fix_workload.then_some(FIXED_WORKLOAD));

        AppliedIntervention {
            fixed_attendance: self.fix_attendance,
            fixed_workload: self.fix_workload,
            attendance,
            workload_tasks,
            late_submissions: self.target_late_submissions,
            missed_submissions: self.target_missed_submissions,
        }
    }
}

/// Resolved hypothetical values, echoed back with the simulation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedIntervention {
    pub fixed_attendance: bool,
    pub fixed_workload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workload_tasks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_submissions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missed_submissions: Option<u32>,
}

impl AppliedIntervention {
    /// Builds the hypothetical snapshot. An attendance override also resets the previous
    /// attendance so the drop rule compares against a stabilized baseline.
    pub fn apply(&self, snapshot: &StudentSnapshot) -> StudentSnapshot {
        let mut modified = snapshot.clone();

        if let Some(attendance) = self.attendance {
            modified = modified
                .with_attendance(attendance)
                .with_previous_attendance(attendance);
        }
        if let Some(workload) = self.workload_tasks {
            modified = modified.with_workload(workload);
        }
        if let Some(late) = self.late_submissions {
            modified = modified.with_late_submissions(late);
        }
        if let Some(missed) = self.missed_submissions {
            modified = modified.with_missed_submissions(missed);
        }

        modified
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleChangeKind {
    Resolved,
    Triggered,
}

/// One entry of the per-rule diff between the stored and hypothetical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleChange {
    pub rule: RuleKind,
    pub change: RuleChangeKind,
    pub detail: String,
}

impl RuleChange {
    fn describe(&self) -> String {
        match self.change {
            RuleChangeKind::Resolved => format!("Resolves: {}", self.detail),
            RuleChangeKind::Triggered => format!("Triggers: {}", self.detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfResult {
    pub original_score: u8,
    pub original_level: RiskLevel,
    pub new_score: u8,
    pub new_level: RiskLevel,
    pub reduction_points: i16,
    pub reduction_percent: f64,
    pub changes: Vec<RuleChange>,
    pub explanation: String,
    pub interventions: AppliedIntervention,
}

/// Re-scores a hypothetical copy of `snapshot`. The stored snapshot is only borrowed.
pub fn simulate(snapshot: &StudentSnapshot, intervention: &Intervention) -> WhatIfResult {
    let original = compute_risk(snapshot);
    let applied = intervention.resolve();
    let modified = applied.apply(snapshot);
    let updated = compute_risk(&modified);

    let changes = diff_rules(&original, &updated);
    let explanation = if !changes.is_empty() {
        changes
            .iter()
            .map(RuleChange::describe)
            .collect::<Vec<_>>()
            .join(" | ")
    } else if modified != *snapshot {
        STABLE.to_string()
    } else {
        NO_CHANGES.to_string()
    };

    let reduction_points = i16::from(original.score) - i16::from(updated.score);
    let reduction_percent = if original.score == 0 {
        0.0
    } else {
        round_to(
            f64::from(reduction_points) / f64::from(original.score) * 100.0,
            1,
        )
    };

    WhatIfResult {
        original_score: original.score,
        original_level: RiskLevel::from_behavioral_score(original.score),
        new_score: updated.score,
        new_level: RiskLevel::from_behavioral_score(updated.score),
        reduction_points,
        reduction_percent,
        changes,
        explanation,
        interventions: applied,
    }
}

fn diff_rules(original: &RuleResult<RuleKind>, updated: &RuleResult<RuleKind>) -> Vec<RuleChange> {
    let resolved = original
        .triggers
        .iter()
        .filter(|trigger| !updated.fired(trigger.kind))
        .map(|trigger| RuleChange {
            rule: trigger.kind,
            change: RuleChangeKind::Resolved,
            detail: trigger.message.clone(),
        });

    let triggered = updated
        .triggers
        .iter()
        .filter(|trigger| !original.fired(trigger.kind))
        .map(|trigger| RuleChange {
            rule: trigger.kind,
            change: RuleChangeKind::Triggered,
            detail: trigger.message.clone(),
        });

    resolved.chain(triggered).collect()
}
