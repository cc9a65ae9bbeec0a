//! "Silent collapse" detection: stress that is rising, volatile, or persistent while
//! observable academic performance still looks stable.

use super::trajectory::TrendStats;
use crate::risk::RiskLevel;
use serde::Serialize;

const PLACEHOLDER_DRIVER: &str = "Overall risk level elevated without a dominant trend signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollapseLevel {
    Low,
    Watch,
    Elevated,
}

impl CollapseLevel {
    pub const fn from_score(score: u8) -> Self {
        if score >= 60 {
            Self::Elevated
        } else if score >= 35 {
            Self::Watch
        } else {
            Self::Low
        }
    }
}

/// Inputs to the detector, gathered from the fused result and its trajectory.
#[derive(Debug, Clone, Copy)]
pub struct CollapseSignals {
    pub final_level: RiskLevel,
    pub final_score: u8,
    pub academic_performance: i32,
    pub trend: TrendStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapseAssessment {
    pub level: CollapseLevel,
    pub score: u8,
    pub drivers: Vec<String>,
}

pub fn assess_collapse(signals: &CollapseSignals) -> CollapseAssessment {
    let CollapseSignals {
        final_level,
        final_score,
        academic_performance,
        trend,
    } = *signals;
    let mut score: u32 = 0;
    let mut drivers = Vec::new();

    // base contribution from the current level, never a driver on its own
    match final_level {
        RiskLevel::High => score += 25,
        RiskLevel::Moderate => score += 15,
        RiskLevel::Low => {}
    }

    if trend.slope > 0.3 {
        score += 25;
        drivers.push(format!(
            "Sustained increase in stress trajectory (slope {:.2})",
            trend.slope
        ));
    } else if trend.slope > 0.15 {
        score += 15;
        drivers.push(format!(
            "Gradual increase in stress trajectory (slope {:.2})",
            trend.slope
        ));
    }

    if trend.volatility > 0.5 {
        score += 20;
        drivers.push(format!(
            "High stress volatility ({:.2})",
            trend.volatility
        ));
    } else if trend.volatility > 0.3 {
        score += 10;
        drivers.push(format!(
            "Moderate stress volatility ({:.2})",
            trend.volatility
        ));
    }

    if trend.persistence >= 5 {
        score += 20;
        drivers.push(format!(
            "Stress above threshold for {} consecutive periods",
            trend.persistence
        ));
    } else if trend.persistence >= 3 {
        score += 10;
        drivers.push(format!(
            "Stress above threshold for {} consecutive periods",
            trend.persistence
        ));
    }

    let performance_stable = academic_performance >= 2;
    if performance_stable && final_score >= 40 {
        score += 15;
        drivers.push(format!(
            "Academic performance stable ({academic_performance}/5) while stress is elevated"
        ));
    }

    if trend.slope > 0.2 && trend.persistence >= 3 && performance_stable {
        score += 10;
        drivers.push("Rising, persistent stress masked by stable academics".to_string());
    }

    let score = score.min(100) as u8;
    let level = CollapseLevel::from_score(score);
    if level != CollapseLevel::Low && drivers.is_empty() {
        drivers.push(PLACEHOLDER_DRIVER.to_string());
    }

    CollapseAssessment {
        level,
        score,
        drivers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(level: RiskLevel, score: u8, performance: i32, trend: TrendStats) -> CollapseSignals {
        CollapseSignals {
            final_level: level,
            final_score: score,
            academic_performance: performance,
            trend,
        }
    }

    fn flat() -> TrendStats {
        TrendStats {
            slope: 0.0,
            volatility: 0.0,
            persistence: 0,
        }
    }

    #[test]
    fn calm_low_risk_student_is_low() {
        let assessment = assess_collapse(&signals(RiskLevel::Low, 20, 3, flat()));
        assert_eq!(assessment.level, CollapseLevel::Low);
        assert_eq!(assessment.score, 0);
        assert!(assessment.drivers.is_empty());
    }

    #[test]
    fn rising_persistent_stress_with_stable_grades_is_elevated() {
        let trend = TrendStats {
            slope: 0.42,
            volatility: 0.2,
            persistence: 6,
        };
        let assessment = assess_collapse(&signals(RiskLevel::High, 68, 3, trend));

        // 25 level + 25 slope + 20 persistence + 15 masking + 10 amplification
        assert_eq!(assessment.score, 95);
        assert_eq!(assessment.level, CollapseLevel::Elevated);
        assert_eq!(assessment.drivers.len(), 4);
        assert!(assessment.drivers[0].starts_with("Sustained increase"));
    }

    #[test]
    fn struggling_grades_do_not_count_as_masking() {
        let trend = TrendStats {
            slope: 0.25,
            volatility: 0.35,
            persistence: 3,
        };
        let assessment = assess_collapse(&signals(RiskLevel::Moderate, 50, 1, trend));

        // 15 level + 15 slope + 10 volatility + 10 persistence
        assert_eq!(assessment.score, 50);
        assert_eq!(assessment.level, CollapseLevel::Watch);
        assert!(assessment
            .drivers
            .iter()
            .all(|driver| !driver.contains("masked")));
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let trend = TrendStats {
            slope: 0.9,
            volatility: 0.8,
            persistence: 8,
        };
        let assessment = assess_collapse(&signals(RiskLevel::High, 90, 4, trend));
        assert_eq!(assessment.score, 100);
    }

    #[test]
    fn watch_or_above_always_has_drivers() {
        for persistence in 0..=8 {
            for slope in [0.0, 0.16, 0.21, 0.31] {
                for volatility in [0.0, 0.31, 0.51] {
                    for level in [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High] {
                        let trend = TrendStats {
                            slope,
                            volatility,
                            persistence,
                        };
                        let assessment = assess_collapse(&signals(level, 45, 2, trend));
                        if assessment.score >= 35 {
                            assert!(!assessment.drivers.is_empty());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(CollapseLevel::from_score(34), CollapseLevel::Low);
        assert_eq!(CollapseLevel::from_score(35), CollapseLevel::Watch);
        assert_eq!(CollapseLevel::from_score(59), CollapseLevel::Watch);
        assert_eq!(CollapseLevel::from_score(60), CollapseLevel::Elevated);
    }
}
