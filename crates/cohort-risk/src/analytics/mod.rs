//! Psychometric analytics: survey rules fused with a stress classifier, plus the synthetic
//! trajectory and silent-collapse detection built on top of the fused score.

pub mod classifier;
pub mod collapse;
pub mod dataset;
mod engine;
pub mod features;
pub mod fusion;
mod rules;
pub mod trajectory;

pub use classifier::{
    predict_with_fallback, ClassifierError, Prediction, PredictionSource, StressClassifier,
};
pub use collapse::{assess_collapse, CollapseAssessment, CollapseLevel, CollapseSignals};
pub use dataset::DatasetError;
pub use engine::{AnalyticsEngine, AnalyticsStats, StudentAnalytics};
pub use features::{Feature, FeatureRow};
pub use fusion::{fuse, FeatureImpact, FusionResult};
pub use rules::{compute_rule_risk, SurveyRule};
pub use trajectory::{synthesize_trajectory, TrendStats};
