use crate::infra::{initialized_cohort, InMemorySnapshotRepository};
use clap::Args;
use cohort_risk::analytics::{dataset, AnalyticsEngine, StudentAnalytics};
use cohort_risk::cohort::{AtRiskStudent, CohortService, CohortStats, WhatIfRequest};
use cohort_risk::config::CohortConfig;
use cohort_risk::error::AppError;
use cohort_risk::risk::{Intervention, StudentId, WhatIfResult};
use std::fmt;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CohortReportArgs {
    /// Number of synthetic students to generate
    #[arg(long, default_value_t = 50)]
    pub(crate) size: usize,
    /// Seed for a reproducible cohort
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Maximum at-risk rows to print
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Student to simulate (synthetic ids start at 1000)
    #[arg(long)]
    pub(crate) student_id: u32,
    /// Seed for the synthetic cohort the student is drawn from
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Number of synthetic students to generate
    #[arg(long, default_value_t = 50)]
    pub(crate) size: usize,
    /// Raise attendance to 90%
    #[arg(long)]
    pub(crate) fix_attendance: bool,
    /// Bring workload back to 10 tasks
    #[arg(long)]
    pub(crate) fix_workload: bool,
    /// Explicit attendance target; wins over --fix-attendance
    #[arg(long)]
    pub(crate) attendance: Option<f64>,
    /// Explicit workload target; wins over --fix-workload
    #[arg(long)]
    pub(crate) workload: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyticsArgs {
    /// Survey CSV export
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Maximum rows to print per section
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

pub(crate) fn run_cohort_report(args: CohortReportArgs) -> Result<(), AppError> {
    let service = initialized_cohort(&CohortConfig {
        size: args.size,
        seed: args.seed,
    })?;
    print!("{}", render_cohort_report(&service, args.limit)?);
    Ok(())
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let service = initialized_cohort(&CohortConfig {
        size: args.size,
        seed: args.seed,
    })?;

    let request = WhatIfRequest {
        student_id: StudentId(args.student_id),
        intervention: Intervention {
            fix_attendance: args.fix_attendance,
            fix_workload: args.fix_workload,
            target_attendance: args.attendance,
            target_workload: args.workload,
            ..Intervention::default()
        },
    };
    let result = service.simulate(&request)?;
    print!("{}", render_simulation(request.student_id, &result));
    Ok(())
}

pub(crate) fn run_analytics_report(args: AnalyticsArgs) -> Result<(), AppError> {
    let rows = dataset::from_path(&args.dataset)?;
    let engine = AnalyticsEngine::load(&rows, None);
    print!("{}", render_analytics_report(&engine, args.limit));
    Ok(())
}

pub(crate) fn render_cohort_report(
    service: &CohortService<InMemorySnapshotRepository>,
    limit: usize,
) -> Result<String, AppError> {
    let report = CohortReport {
        stats: service.stats()?,
        flagged: service.at_risk()?,
        limit,
    };
    Ok(report.to_string())
}

pub(crate) fn render_simulation(student_id: StudentId, result: &WhatIfResult) -> String {
    SimulationReport { student_id, result }.to_string()
}

pub(crate) fn render_analytics_report(engine: &AnalyticsEngine, limit: usize) -> String {
    AnalyticsReport { engine, limit }.to_string()
}

struct CohortReport {
    stats: CohortStats,
    flagged: Vec<AtRiskStudent>,
    limit: usize,
}

impl fmt::Display for CohortReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "Cohort risk report")?;
        writeln!(
            f,
            "- {} students | High {} | Moderate {} | Low {}",
            stats.total_students, stats.high_risk, stats.moderate_risk, stats.low_risk
        )?;
        writeln!(
            f,
            "- Average risk {:.1} | average anomaly {:.3}",
            stats.average_risk, stats.average_anomaly
        )?;

        if self.flagged.is_empty() {
            return writeln!(f, "\nNo students currently at risk.");
        }

        writeln!(
            f,
            "\nAt-risk students (showing {} of {})",
            self.flagged.len().min(self.limit),
            self.flagged.len()
        )?;
        for student in self.flagged.iter().take(self.limit) {
            let summary = &student.summary;
            writeln!(
                f,
                "  {} {:<24} {:<18} {:>3} {:<8} {} flag(s) | anomaly {:.3}",
                summary.student_id,
                summary.name,
                summary.department,
                summary.risk_score,
                summary.risk_level,
                student.flag_count,
                summary.anomaly_score
            )?;
        }
        Ok(())
    }
}

struct SimulationReport<'a> {
    student_id: StudentId,
    result: &'a WhatIfResult,
}

impl fmt::Display for SimulationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "What-if simulation for student {}", self.student_id)?;
        writeln!(
            f,
            "- Current: {} ({})",
            result.original_score, result.original_level
        )?;
        writeln!(f, "- Simulated: {} ({})", result.new_score, result.new_level)?;
        writeln!(
            f,
            "- Reduction: {} points ({:.1}%)",
            result.reduction_points, result.reduction_percent
        )?;
        writeln!(f, "- {}", result.explanation)
    }
}

struct AnalyticsReport<'a> {
    engine: &'a AnalyticsEngine,
    limit: usize,
}

impl fmt::Display for AnalyticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.engine.stats();
        writeln!(f, "Psychometric analytics")?;
        writeln!(
            f,
            "- {} students | High {} | Moderate {} | Low {}",
            stats.total_students, stats.high_risk, stats.moderate_risk, stats.low_risk
        )?;
        writeln!(
            f,
            "- Average fused score {:.1} | average confidence {:.3}",
            stats.average_score, stats.average_confidence
        )?;
        writeln!(
            f,
            "- Silent collapse: {} watch | {} elevated",
            stats.collapse_watch, stats.collapse_elevated
        )?;

        writeln!(f, "\nHighest fused scores")?;
        let mut ranked: Vec<&StudentAnalytics> = self.engine.students().iter().collect();
        ranked.sort_by(|a, b| b.fusion.final_score.cmp(&a.fusion.final_score));
        for student in ranked.into_iter().take(self.limit) {
            let drivers = student
                .fusion
                .top_feature_impacts
                .iter()
                .take(3)
                .map(|impact| format!("{} {:+.3}", impact.feature, impact.impact))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "  #{:<5} {:>3} {:<8} label {} | rules {:>3} | {}",
                student.student_id.0,
                student.fusion.final_score,
                student.fusion.final_level,
                student.fusion.ml_label,
                student.fusion.rule_score,
                drivers
            )?;
        }

        let watchlist = self.engine.collapse_watchlist();
        if watchlist.is_empty() {
            return writeln!(f, "\nCollapse watchlist is empty.");
        }

        writeln!(f, "\nCollapse watchlist")?;
        for student in watchlist.into_iter().take(self.limit) {
            writeln!(
                f,
                "  #{:<5} {:?} ({})",
                student.student_id.0, student.collapse.level, student.collapse.score
            )?;
            for driver in &student.collapse.drivers {
                writeln!(f, "      - {driver}")?;
            }
        }
        Ok(())
    }
}
