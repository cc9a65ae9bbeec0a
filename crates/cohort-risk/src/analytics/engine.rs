use super::classifier::{predict_with_fallback, PredictionSource, StressClassifier};
use super::collapse::{assess_collapse, CollapseAssessment, CollapseLevel, CollapseSignals};
use super::features::FeatureRow;
use super::fusion::{fuse, FusionResult};
use super::rules::compute_rule_risk;
use super::trajectory::{synthesize_trajectory, TrendStats};
use crate::risk::anomaly::round_to;
use crate::risk::trend::TrendPoint;
use crate::risk::{RiskLevel, StudentId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

const FIRST_STUDENT_ID: u32 = 1;

/// Fused psychometric view of one survey respondent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnalytics {
    pub student_id: StudentId,
    pub prediction_source: PredictionSource,
    #[serde(flatten)]
    pub fusion: FusionResult,
    pub trajectory: Vec<TrendPoint>,
    pub trend_stats: TrendStats,
    pub collapse: CollapseAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_students: usize,
    pub low_risk: usize,
    pub moderate_risk: usize,
    pub high_risk: usize,
    pub average_score: f64,
    pub average_confidence: f64,
    pub collapse_watch: usize,
    pub collapse_elevated: usize,
}

/// Precomputed analytics for a loaded survey dataset.
///
/// Everything is computed in [`AnalyticsEngine::load`]; lookups afterwards are read-only.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    students: Vec<StudentAnalytics>,
}

impl AnalyticsEngine {
    pub fn load(rows: &[FeatureRow], classifier: Option<&dyn StressClassifier>) -> Self {
        let students: Vec<StudentAnalytics> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| analyze_row(index, row, classifier))
            .collect();

        tracing::info!(
            students = students.len(),
            classifier = classifier.is_some(),
            "analytics engine loaded"
        );

        Self { students }
    }

    pub fn students(&self) -> &[StudentAnalytics] {
        &self.students
    }

    pub fn student(&self, id: StudentId) -> Option<&StudentAnalytics> {
        self.students
            .iter()
            .find(|student| student.student_id == id)
    }

    pub fn stats(&self) -> AnalyticsStats {
        let total = self.students.len();
        let count_level = |level: RiskLevel| {
            self.students
                .iter()
                .filter(|student| student.fusion.final_level == level)
                .count()
        };
        let count_collapse = |level: CollapseLevel| {
            self.students
                .iter()
                .filter(|student| student.collapse.level == level)
                .count()
        };

        let (average_score, average_confidence) = if total == 0 {
            (0.0, 0.0)
        } else {
            let score_sum: f64 = self
                .students
                .iter()
                .map(|student| f64::from(student.fusion.final_score))
                .sum();
            let confidence_sum: f64 = self
                .students
                .iter()
                .map(|student| student.fusion.ml_confidence)
                .sum();
            (
                round_to(score_sum / total as f64, 1),
                round_to(confidence_sum / total as f64, 3),
            )
        };

        AnalyticsStats {
            total_students: total,
            low_risk: count_level(RiskLevel::Low),
            moderate_risk: count_level(RiskLevel::Moderate),
            high_risk: count_level(RiskLevel::High),
            average_score,
            average_confidence,
            collapse_watch: count_collapse(CollapseLevel::Watch),
            collapse_elevated: count_collapse(CollapseLevel::Elevated),
        }
    }

    /// Students whose collapse level is Watch or Elevated, highest collapse score first.
    pub fn collapse_watchlist(&self) -> Vec<&StudentAnalytics> {
        let mut watchlist: Vec<&StudentAnalytics> = self
            .students
            .iter()
            .filter(|student| student.collapse.level != CollapseLevel::Low)
            .collect();
        watchlist.sort_by(|a, b| b.collapse.score.cmp(&a.collapse.score));
        watchlist
    }
}

fn analyze_row(
    index: usize,
    row: &FeatureRow,
    classifier: Option<&dyn StressClassifier>,
) -> StudentAnalytics {
    let (prediction, prediction_source) = predict_with_fallback(classifier, row);
    let rules = compute_rule_risk(row);
    let fusion = fuse(row, prediction, rules.score, rules.messages());

    let mut rng = StdRng::seed_from_u64(index as u64);
    let trajectory = synthesize_trajectory(row, fusion.final_score, &mut rng);
    let trend_stats = TrendStats::from_points(&trajectory);
    let collapse = assess_collapse(&CollapseSignals {
        final_level: fusion.final_level,
        final_score: fusion.final_score,
        academic_performance: row.academic_performance,
        trend: trend_stats,
    });

    StudentAnalytics {
        student_id: StudentId(FIRST_STUDENT_ID + index as u32),
        prediction_source,
        fusion,
        trajectory,
        trend_stats,
        collapse,
    }
}
