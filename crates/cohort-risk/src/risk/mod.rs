//! Behavioral risk engine: rule scoring, anomaly detection, recommendations, synthetic trends,
//! and what-if simulation over [`StudentSnapshot`] values.

pub(crate) mod anomaly;
pub mod domain;
pub mod generator;
mod recommendations;
mod rules;
pub mod simulation;
pub mod trend;

pub use anomaly::anomaly_score;
pub use domain::{RiskLevel, RuleKind, RuleResult, RuleTrigger, StudentId, StudentSnapshot};
pub use generator::generate_cohort;
pub use recommendations::{recommend, Recommendation, RecommendationPriority};
pub use rules::compute_risk;
pub use simulation::{simulate, AppliedIntervention, Intervention, WhatIfResult};
pub use trend::{synthesize_behavioral_trend, TrendPoint};

use rand::Rng;
use serde::Serialize;

/// Everything the dashboard shows for one snapshot, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub anomaly_score: f64,
    pub triggers: Vec<RuleTrigger<RuleKind>>,
    pub recommendations: Vec<Recommendation>,
    pub trend: Vec<TrendPoint>,
}

impl RiskAssessment {
    pub fn evaluate<R: Rng + ?Sized>(snapshot: &StudentSnapshot, rng: &mut R) -> Self {
        let result = compute_risk(snapshot);
        let recommendations = recommend(&result.kinds());
        let trend = synthesize_behavioral_trend(result.score, rng);

        Self {
            score: result.score,
            level: RiskLevel::from_behavioral_score(result.score),
            anomaly_score: anomaly_score(snapshot),
            triggers: result.triggers,
            recommendations,
            trend,
        }
    }

    pub fn rule_messages(&self) -> Vec<String> {
        self.triggers
            .iter()
            .map(|trigger| trigger.message.clone())
            .collect()
    }
}
