//! Synthetic trend generation for the dashboard timeline.
//!
//! No observed history exists for a student, so these points are generated from the current
//! score for visualization only. Callers inject the random source; a seeded `StdRng` gives a
//! reproducible series.

use super::domain::RiskLevel;
use rand::Rng;
use serde::Serialize;

pub const BEHAVIORAL_TREND_WEEKS: usize = 6;

/// One period of a synthetic trend, already quantized to a risk band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub week: String,
    pub score: u8,
    pub level: RiskLevel,
}

impl TrendPoint {
    pub(crate) fn new(index: usize, score: u8, level: RiskLevel) -> Self {
        Self {
            week: format!("Week {}", index + 1),
            score,
            level,
        }
    }
}

/// Random walk over six weeks starting at the current score with steps in `[-8, 12]`.
///
/// The final week is pinned to `current_score` so the chart ends at "now".
pub fn synthesize_behavioral_trend<R: Rng + ?Sized>(
    current_score: u8,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let mut running = i32::from(current_score);
    let mut points = Vec::with_capacity(BEHAVIORAL_TREND_WEEKS);

    for week in 0..BEHAVIORAL_TREND_WEEKS {
        running = (running + rng.gen_range(-8..=12)).clamp(0, 100);
        let score = running as u8;
        points.push(TrendPoint::new(
            week,
            score,
            RiskLevel::from_behavioral_score(score),
        ));
    }

    if let Some(last) = points.last_mut() {
        last.score = current_score;
        last.level = RiskLevel::from_behavioral_score(current_score);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn trend_ends_at_the_current_score() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trend = synthesize_behavioral_trend(64, &mut rng);
            assert_eq!(trend.len(), BEHAVIORAL_TREND_WEEKS);
            let last = trend.last().expect("trend has points");
            assert_eq!(last.score, 64);
            assert_eq!(last.level, RiskLevel::High);
            assert_eq!(last.week, "Week 6");
        }
    }

    #[test]
    fn scores_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for score in [0u8, 3, 97, 100] {
            let trend = synthesize_behavioral_trend(score, &mut rng);
            assert!(trend.iter().all(|point| point.score <= 100));
        }
    }

    #[test]
    fn same_seed_reproduces_the_series() {
        let first = synthesize_behavioral_trend(40, &mut StdRng::seed_from_u64(11));
        let second = synthesize_behavioral_trend(40, &mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
    }
}
