use super::domain::{RuleKind, RuleResult, RuleTally, StudentSnapshot};

pub(crate) const ATTENDANCE_FLOOR: f64 = 75.0;
pub(crate) const LATE_SUBMISSION_LIMIT: u32 = 2;
pub(crate) const WORKLOAD_SPIKE_PCT: f64 = 40.0;
pub(crate) const ATTENDANCE_DROP_LIMIT: f64 = 20.0;

/// Evaluates the five behavioral rules in table order.
pub fn compute_risk(snapshot: &StudentSnapshot) -> RuleResult<RuleKind> {
    let mut tally = RuleTally::new();

    if snapshot.attendance_rate < ATTENDANCE_FLOOR {
        tally.add(
            RuleKind::LowAttendance,
            RuleKind::LowAttendance.weight(),
            format!(
                "Attendance below 75% (current: {:?}%)",
                snapshot.attendance_rate
            ),
        );
    }

    if snapshot.late_submissions >= LATE_SUBMISSION_LIMIT {
        tally.add(
            RuleKind::RepeatedLateSubmissions,
            RuleKind::RepeatedLateSubmissions.weight(),
            format!(
                "Multiple late submissions ({} assignments)",
                snapshot.late_submissions
            ),
        );
    }

    // no baseline, no spike: the rule is skipped rather than dividing by zero
    if let Some(increase) = snapshot.workload_increase_pct() {
        if increase > WORKLOAD_SPIKE_PCT {
            tally.add(
                RuleKind::WorkloadSpike,
                RuleKind::WorkloadSpike.weight(),
                format!("Workload increased by {increase:.0}%"),
            );
        }
    }

    if snapshot.missed_submissions > 0 {
        tally.add(
            RuleKind::MissingSubmissions,
            RuleKind::MissingSubmissions.weight(),
            format!("Missing {} assignment(s)", snapshot.missed_submissions),
        );
    }

    let drop = snapshot.attendance_drop();
    if drop > ATTENDANCE_DROP_LIMIT {
        tally.add(
            RuleKind::SuddenAttendanceDrop,
            RuleKind::SuddenAttendanceDrop.weight(),
            format!("Sudden attendance drop ({drop:.0}% decrease)"),
        );
    }

    tally.finish()
}
