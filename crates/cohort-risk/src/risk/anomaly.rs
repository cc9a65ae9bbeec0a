use super::domain::StudentSnapshot;

const ATTENDANCE_BASELINE: f64 = 85.0;
const WORKLOAD_BASELINE: f64 = 10.0;

/// Deviation of a student's behavior from cohort baselines, in `[0, 1]`.
///
/// Weighted blend of attendance distance from 85%, late submissions relative to five, and
/// workload distance from ten tasks. Rounded to three decimals for display.
pub fn anomaly_score(snapshot: &StudentSnapshot) -> f64 {
    let attendance = (ATTENDANCE_BASELINE - snapshot.attendance_rate).abs() / ATTENDANCE_BASELINE;
    let late = (f64::from(snapshot.late_submissions) / 5.0).min(1.0);
    let workload =
        ((f64::from(snapshot.workload_tasks) - WORKLOAD_BASELINE).abs() / 15.0).min(1.0);

    let score = 0.4 * attendance + 0.35 * late + 0.25 * workload;
    round_to(score.min(1.0), 3)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
