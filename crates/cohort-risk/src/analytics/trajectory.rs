//! Synthetic eight-period stress trajectory and the statistics derived from it.
//!
//! The survey dataset is a single snapshot, so the trajectory is generated, not observed. It
//! is seeded per student so repeated loads reproduce the same curve.

use super::features::FeatureRow;
use crate::risk::trend::TrendPoint;
use crate::risk::RiskLevel;
use rand::Rng;
use serde::Serialize;

pub const TRAJECTORY_PERIODS: usize = 8;
pub const PERSISTENCE_THRESHOLD: u8 = 40;

/// Counts the survey signals that suggest stress has been building rather than holding.
pub fn rising_factor_count(row: &FeatureRow) -> u8 {
    [
        row.anxiety_level > 12,
        row.depression > 15,
        row.sleep_quality < 2,
        row.study_load > 3,
    ]
    .into_iter()
    .filter(|signal| *signal)
    .count() as u8
}

/// Builds the trajectory ending at `final_score`.
///
/// Two or more rising factors produce a ramp from a lower base; otherwise the series hovers
/// around the final score. Noise is uniform in `[-5, 5]`.
pub fn synthesize_trajectory<R: Rng + ?Sized>(
    row: &FeatureRow,
    final_score: u8,
    rng: &mut R,
) -> Vec<TrendPoint> {
    let rising = i32::from(rising_factor_count(row));
    let target = i32::from(final_score);
    let base = (target - 25 - 5 * rising).max(10);
    let last = TRAJECTORY_PERIODS - 1;

    (0..TRAJECTORY_PERIODS)
        .map(|period| {
            let score = if period == last {
                final_score
            } else {
                let center = if rising >= 2 {
                    let progress = period as f64 / last as f64;
                    f64::from(base) + f64::from(target - base) * progress
                } else {
                    f64::from(target)
                };
                let noisy = center as i32 + rng.gen_range(-5..=5);
                noisy.clamp(0, 100) as u8
            };
            TrendPoint::new(period, score, RiskLevel::from_psychometric_score(score))
        })
        .collect()
}

/// Shape statistics over a trajectory, each normalized for the collapse detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendStats {
    pub slope: f64,
    pub volatility: f64,
    pub persistence: usize,
}

impl TrendStats {
    pub fn from_scores(scores: &[u8]) -> Self {
        Self {
            slope: normalized_slope(scores),
            volatility: normalized_volatility(scores),
            persistence: persistence_above(scores, PERSISTENCE_THRESHOLD),
        }
    }

    pub fn from_points(points: &[TrendPoint]) -> Self {
        let scores: Vec<u8> = points.iter().map(|point| point.score).collect();
        Self::from_scores(&scores)
    }
}

/// Least-squares slope against the period index, scaled by 1/10 into `[-1, 1]`.
fn normalized_slope(scores: &[u8]) -> f64 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = mean(scores);
    let (covariance, variance) = scores.iter().enumerate().fold(
        (0.0, 0.0),
        |(covariance, variance), (index, score)| {
            let dx = index as f64 - mean_x;
            (
                covariance + dx * (f64::from(*score) - mean_y),
                variance + dx * dx,
            )
        },
    );

    (covariance / variance / 10.0).clamp(-1.0, 1.0)
}

/// Population standard deviation scaled by 1/25 into `[0, 1]`.
fn normalized_volatility(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let mean_y = mean(scores);
    let variance = scores
        .iter()
        .map(|score| (f64::from(*score) - mean_y).powi(2))
        .sum::<f64>()
        / scores.len() as f64;

    (variance.sqrt() / 25.0).clamp(0.0, 1.0)
}

/// Longest run of consecutive periods at or above `threshold`.
fn persistence_above(scores: &[u8], threshold: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for score in scores {
        if *score >= threshold {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn mean(scores: &[u8]) -> f64 {
    scores.iter().map(|score| f64::from(*score)).sum::<f64>() / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rising_row() -> FeatureRow {
        FeatureRow {
            anxiety_level: 16,
            depression: 20,
            sleep_quality: 1,
            study_load: 4,
            ..FeatureRow::default()
        }
    }

    #[test]
    fn rising_factors_are_counted_per_signal() {
        assert_eq!(rising_factor_count(&rising_row()), 4);
        let calm = FeatureRow {
            sleep_quality: 3,
            ..FeatureRow::default()
        };
        assert_eq!(rising_factor_count(&calm), 0);
    }

    #[test]
    fn trajectory_always_ends_at_the_final_score() {
        for seed in 0..64 {
            for final_score in [0u8, 12, 40, 68, 100] {
                let mut rng = StdRng::seed_from_u64(seed);
                let points = synthesize_trajectory(&rising_row(), final_score, &mut rng);
                assert_eq!(points.len(), TRAJECTORY_PERIODS);
                assert_eq!(points[TRAJECTORY_PERIODS - 1].score, final_score);
                assert!(points.iter().all(|point| point.score <= 100));
            }
        }
    }

    #[test]
    fn rising_rows_ramp_up_from_a_lower_base() {
        let mut rng = StdRng::seed_from_u64(5);
        let points = synthesize_trajectory(&rising_row(), 80, &mut rng);
        // base = max(10, 80 - 25 - 20) = 35, first period within noise of it
        assert!((30..=40).contains(&points[0].score));
    }

    #[test]
    fn same_seed_reproduces_the_trajectory() {
        let first = synthesize_trajectory(&rising_row(), 55, &mut StdRng::seed_from_u64(9));
        let second = synthesize_trajectory(&rising_row(), 55, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }

    #[test]
    fn linear_series_has_exact_slope() {
        let scores = [10, 20, 30, 40, 50, 60, 70, 80];
        let stats = TrendStats::from_scores(&scores);
        assert!((stats.slope - 1.0).abs() < 1e-9);
        assert_eq!(stats.persistence, 5);
    }

    #[test]
    fn flat_series_has_no_slope_or_volatility() {
        let stats = TrendStats::from_scores(&[45; 8]);
        assert_eq!(stats.slope, 0.0);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.persistence, 8);
    }

    #[test]
    fn volatility_uses_population_deviation() {
        // mean 50, every deviation 25, population sd 25
        let stats = TrendStats::from_scores(&[25, 75, 25, 75]);
        assert!((stats.volatility - 1.0).abs() < 1e-9);
    }

    #[test]
    fn persistence_tracks_the_longest_run() {
        let stats = TrendStats::from_scores(&[41, 42, 10, 40, 40, 40, 39, 50]);
        assert_eq!(stats.persistence, 3);
    }
}
