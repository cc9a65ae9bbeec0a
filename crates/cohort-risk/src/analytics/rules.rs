use super::features::FeatureRow;
use crate::risk::domain::{RuleResult, RuleTally};
use serde::{Deserialize, Serialize};

/// Symbolic identity of each psychometric threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyRule {
    HighAnxiety,
    ElevatedDepression,
    PoorSleep,
    LowSocialSupport,
    HighPeerPressure,
    AcademicStruggle,
    BullyingExposure,
    ExcessiveStudyLoad,
    MentalHealthHistory,
}

impl SurveyRule {
    pub const fn weight(self) -> u8 {
        match self {
            Self::HighAnxiety => 20,
            Self::ElevatedDepression => 20,
            Self::PoorSleep => 15,
            Self::LowSocialSupport => 15,
            Self::HighPeerPressure => 10,
            Self::AcademicStruggle => 15,
            Self::BullyingExposure => 20,
            Self::ExcessiveStudyLoad => 10,
            Self::MentalHealthHistory => 15,
        }
    }
}

/// Evaluates the nine survey rules in table order and caps the sum at 100.
pub fn compute_rule_risk(row: &FeatureRow) -> RuleResult<SurveyRule> {
    let mut tally = RuleTally::new();
    let mut fire = |rule: SurveyRule, message: String| tally.add(rule, rule.weight(), message);

    if row.anxiety_level > 15 {
        fire(
            SurveyRule::HighAnxiety,
            format!("High anxiety level ({}/21)", row.anxiety_level),
        );
    }
    if row.depression > 18 {
        fire(
            SurveyRule::ElevatedDepression,
            format!("Elevated depression indicators ({}/27)", row.depression),
        );
    }
    if row.sleep_quality < 2 {
        fire(
            SurveyRule::PoorSleep,
            format!("Poor sleep quality ({}/5)", row.sleep_quality),
        );
    }
    if row.social_support < 2 {
        fire(
            SurveyRule::LowSocialSupport,
            format!("Insufficient social support ({}/3)", row.social_support),
        );
    }
    if row.peer_pressure > 3 {
        fire(
            SurveyRule::HighPeerPressure,
            format!("High peer pressure ({}/5)", row.peer_pressure),
        );
    }
    if row.academic_performance < 2 {
        fire(
            SurveyRule::AcademicStruggle,
            format!(
                "Academic performance concerns ({}/5)",
                row.academic_performance
            ),
        );
    }
    if row.bullying > 3 {
        fire(
            SurveyRule::BullyingExposure,
            format!("Bullying exposure detected ({}/5)", row.bullying),
        );
    }
    if row.study_load > 4 {
        fire(
            SurveyRule::ExcessiveStudyLoad,
            format!("Excessive study load ({}/5)", row.study_load),
        );
    }
    if row.mental_health_history == 1 {
        fire(
            SurveyRule::MentalHealthHistory,
            "Previous mental health history".to_string(),
        );
    }

    tally.finish()
}
