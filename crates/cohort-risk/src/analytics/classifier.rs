use super::features::FeatureRow;
use serde::Serialize;

pub const DEFAULT_LABEL: u8 = 1;
pub const GROUND_TRUTH_CONFIDENCE: f64 = 0.85;
pub const FAILURE_CONFIDENCE: f64 = 0.7;

/// Class label and confidence produced by the stress classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: u8,
    pub confidence: f64,
}

/// Where a prediction came from, surfaced so the dashboard can flag fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Classifier,
    GroundTruth,
    ClassifierFallback,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier rejected features: {0}")]
    InvalidFeatures(String),
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

/// External model that labels a survey row. Trained inference lives outside this crate.
pub trait StressClassifier: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<Prediction, ClassifierError>;
}

/// Runs the classifier if present, substituting the ground-truth label on absence or failure.
pub fn predict_with_fallback(
    classifier: Option<&dyn StressClassifier>,
    row: &FeatureRow,
) -> (Prediction, PredictionSource) {
    let ground_truth = row.stress_level.unwrap_or(DEFAULT_LABEL);

    match classifier {
        None => (
            Prediction {
                label: ground_truth,
                confidence: GROUND_TRUTH_CONFIDENCE,
            },
            PredictionSource::GroundTruth,
        ),
        Some(classifier) => match classifier.predict(row) {
            Ok(prediction) => (prediction, PredictionSource::Classifier),
            Err(err) => {
                tracing::warn!(error = %err, "classifier failed, using ground-truth label");
                (
                    Prediction {
                        label: ground_truth,
                        confidence: FAILURE_CONFIDENCE,
                    },
                    PredictionSource::ClassifierFallback,
                )
            }
        },
    }
}
