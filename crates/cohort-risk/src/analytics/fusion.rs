use super::classifier::Prediction;
use super::features::{Feature, FeatureRow};
use crate::risk::anomaly::round_to;
use crate::risk::RiskLevel;
use serde::Serialize;

const TOP_IMPACTS: usize = 5;

/// Score proxy for each classifier label; unknown labels sit in the middle band.
pub const fn ml_score_proxy(label: u8) -> u8 {
    match label {
        0 => 15,
        1 => 45,
        2 => 80,
        _ => 45,
    }
}

/// `floor(0.6 * proxy + 0.4 * rule_score)`, computed in integers so the floor is exact.
pub fn fused_score(label: u8, rule_score: u8) -> u8 {
    let weighted = 6 * u32::from(ml_score_proxy(label)) + 4 * u32::from(rule_score);
    (weighted / 10).min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImpact {
    pub feature: &'static str,
    pub impact: f64,
}

/// Linear attribution against population means; largest absolute impacts first.
pub fn feature_impacts(row: &FeatureRow) -> Vec<FeatureImpact> {
    let mut impacts: Vec<FeatureImpact> = Feature::weighted()
        .into_iter()
        .map(|feature| {
            let deviation = f64::from(row.value(feature)) - feature.population_mean();
            FeatureImpact {
                feature: feature.display_name(),
                impact: round_to(feature.weight() * deviation, 3),
            }
        })
        .collect();

    // stable sort keeps table order for equal magnitudes
    impacts.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
    impacts.truncate(TOP_IMPACTS);
    impacts
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionResult {
    pub final_score: u8,
    pub final_level: RiskLevel,
    pub ml_label: u8,
    pub ml_confidence: f64,
    pub rule_score: u8,
    pub rule_triggers: Vec<String>,
    pub top_feature_impacts: Vec<FeatureImpact>,
}

pub fn fuse(
    row: &FeatureRow,
    prediction: Prediction,
    rule_score: u8,
    rule_triggers: Vec<String>,
) -> FusionResult {
    let final_score = fused_score(prediction.label, rule_score);

    FusionResult {
        final_score,
        final_level: RiskLevel::from_psychometric_score(final_score),
        ml_label: prediction.label,
        ml_confidence: round_to(prediction.confidence, 3),
        rule_score,
        rule_triggers,
        top_feature_impacts: feature_impacts(row),
    }
}
