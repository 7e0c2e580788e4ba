//! Population statistics over score series.
//!
//! Standard deviation is the one derived value treated as expensive. It sits
//! behind [`StatisticsEngine`] so callers can isolate it from the edit path
//! (memoize it, move it to a worker) and tests can count or slow down calls.

use std::fmt::Debug;

use crate::core::types::{SubjectStats, SubjectStatsSet};
use crate::roster::{Roster, Subject};

/// Expensive statistics backend.
pub trait StatisticsEngine: Debug + Send + Sync {
    /// Population standard deviation of `series`; `0.0` for an empty series.
    fn standard_deviation(&self, series: &[f64]) -> f64;
}

/// Production engine: exact two-pass population standard deviation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PopulationStatistics;

impl StatisticsEngine for PopulationStatistics {
    fn standard_deviation(&self, series: &[f64]) -> f64 {
        standard_deviation(series)
    }
}

/// `sqrt(mean((x - mean(x))^2))`, dividing by N.
pub fn standard_deviation(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Min, max and standard deviation of one subject's raw scores.
///
/// An empty roster reports `min = max = 0`.
pub fn subject_stats(
    roster: &Roster,
    subject: Subject,
    engine: &dyn StatisticsEngine,
) -> SubjectStats {
    let scores = roster.scores(subject);
    let min = scores.iter().copied().min().unwrap_or(0);
    let max = scores.iter().copied().max().unwrap_or(0);
    let series: Vec<f64> = scores.into_iter().map(f64::from).collect();
    SubjectStats {
        min,
        max,
        std_dev: engine.standard_deviation(&series),
    }
}

pub fn subject_stats_set(roster: &Roster, engine: &dyn StatisticsEngine) -> SubjectStatsSet {
    SubjectStatsSet {
        korean: subject_stats(roster, Subject::Korean, engine),
        english: subject_stats(roster, Subject::English, engine),
        math: subject_stats(roster, Subject::Math, engine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{roster_of, student};

    #[test]
    fn constant_series_has_zero_deviation() {
        assert_eq!(standard_deviation(&[0.0, 0.0, 0.0, 0.0, 0.0]), 0.0);
        assert_eq!(standard_deviation(&[42.0; 7]), 0.0);
    }

    #[test]
    fn two_symmetric_points() {
        assert_eq!(standard_deviation(&[100.0, 0.0]), 50.0);
    }

    #[test]
    fn empty_series_is_zero() {
        assert_eq!(standard_deviation(&[]), 0.0);
    }

    #[test]
    fn divides_by_n_not_n_minus_one() {
        // population: sqrt(((1-2)^2 + 0 + (3-2)^2) / 3)
        let expected = (2.0_f64 / 3.0).sqrt();
        assert!((standard_deviation(&[1.0, 2.0, 3.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn subject_stats_reads_raw_scores() {
        let roster = roster_of(vec![
            student(1, "a", 100, 10, 0),
            student(2, "b", 0, 20, 0),
        ]);

        let korean = subject_stats(&roster, Subject::Korean, &PopulationStatistics);
        assert_eq!((korean.min, korean.max), (0, 100));
        assert_eq!(korean.std_dev, 50.0);

        let math = subject_stats(&roster, Subject::Math, &PopulationStatistics);
        assert_eq!((math.min, math.max, math.std_dev), (0, 0, 0.0));
    }

    #[test]
    fn subject_stats_on_empty_roster() {
        let stats = subject_stats(&Roster::default(), Subject::English, &PopulationStatistics);
        assert_eq!((stats.min, stats.max, stats.std_dev), (0, 0, 0.0));
    }
}
