//! Point-statistic (z-score) detector.

use anomaly_api::DEFAULT_MAX_CONTRIBUTORS;
use anomaly_spi::{Dataset, FeatureStatistics, FeatureStats, Result, Tier, TierDetector, TierOutput};
use tracing::debug;

use crate::ranker::explain_rows;

/// A z-score of this size saturates the point-statistic sub-score.
pub const SATURATING_Z: f64 = 3.0;

/// Sub-score of one value under the point-statistic formula.
///
/// `min(100, |v - mean| / std / 3 * 100)`; zero for a missing value or a
/// feature without spread.
pub fn zscore_sub_score(value: Option<f64>, stats: &FeatureStats) -> f64 {
    let Some(v) = value else {
        return 0.0;
    };
    if stats.std_dev.is_nan() || stats.std_dev <= 0.0 {
        return 0.0;
    }
    let z = ((v - stats.mean) / stats.std_dev).abs();
    let score = (z / SATURATING_Z) * 100.0;
    if score.is_nan() {
        0.0
    } else {
        score.min(100.0)
    }
}

/// Z-Score based detector over each feature independently.
///
/// The terminal tier: it is always available and never defers to another
/// detector.
#[derive(Debug, Clone)]
pub struct PointStatisticDetector {
    max_contributors: usize,
}

impl PointStatisticDetector {
    /// Create a new detector reporting up to `max_contributors` per row.
    pub fn new(max_contributors: usize) -> Self {
        Self { max_contributors }
    }
}

impl Default for PointStatisticDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTRIBUTORS)
    }
}

impl TierDetector for PointStatisticDetector {
    fn tier(&self) -> Tier {
        Tier::PointStatistic
    }

    fn availability(&self) -> Result<()> {
        Ok(())
    }

    fn detect(&self, dataset: &Dataset, stats: &FeatureStatistics) -> Result<TierOutput> {
        debug!(rows = dataset.row_count(), "point-statistic scoring");

        let names = dataset.feature_names();
        let per_feature: Vec<FeatureStats> = (0..names.len())
            .map(|j| stats.get(j).copied().unwrap_or_default())
            .collect();
        let features = dataset.features();

        let results = explain_rows(
            &names,
            dataset.row_count(),
            self.max_contributors,
            |row, j| zscore_sub_score(features[j].value(row), &per_feature[j]),
            None::<fn(usize) -> f64>,
        );

        Ok(TierOutput::new(Tier::PointStatistic, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::compute_statistics;

    fn stats(mean: f64, std_dev: f64) -> FeatureStats {
        FeatureStats {
            mean,
            std_dev,
            ..FeatureStats::default()
        }
    }

    #[test]
    fn test_sub_score_linear_and_clamped() {
        let s = stats(10.0, 2.0);
        assert_eq!(zscore_sub_score(Some(10.0), &s), 0.0);
        assert!((zscore_sub_score(Some(13.0), &s) - 50.0).abs() < 1e-9);
        assert!((zscore_sub_score(Some(7.0), &s) - 50.0).abs() < 1e-9);
        assert_eq!(zscore_sub_score(Some(16.0), &s), 100.0);
        assert_eq!(zscore_sub_score(Some(1e6), &s), 100.0);
    }

    #[test]
    fn test_sub_score_degenerate_and_missing() {
        assert_eq!(zscore_sub_score(Some(99.0), &stats(5.0, 0.0)), 0.0);
        assert_eq!(zscore_sub_score(None, &stats(5.0, 1.0)), 0.0);
        assert_eq!(zscore_sub_score(Some(1.0), &stats(f64::NAN, 1.0)), 0.0);
    }

    #[test]
    fn test_sub_score_monotone_in_distance() {
        let s = stats(0.0, 1.5);
        let mut previous = 0.0;
        for step in 0..50 {
            let score = zscore_sub_score(Some(step as f64 * 0.25), &s);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_detect_cpu_example() {
        let dataset =
            Dataset::from_columns("timestamp", &[("cpu_usage", &[45.0, 50.0, 95.0, 48.0])]).unwrap();
        let stats = compute_statistics(&dataset).unwrap();

        let output = PointStatisticDetector::default().detect(&dataset, &stats).unwrap();
        let scores = output.scores();

        let max_row = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(max_row, 2);
        assert_eq!(output.results[2].contributors.len(), 1);
        assert_eq!(output.results[2].top_feature(), Some("cpu_usage"));
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn test_zero_variance_feature_never_flags() {
        let dataset = Dataset::from_columns(
            "timestamp",
            &[("flat", &[3.0, 3.0, 3.0]), ("live", &[1.0, 2.0, 30.0])],
        )
        .unwrap();
        let stats = compute_statistics(&dataset).unwrap();
        let output = PointStatisticDetector::default().detect(&dataset, &stats).unwrap();

        for result in &output.results {
            let flat = result.contributors.iter().find(|c| c.feature == "flat").unwrap();
            assert_eq!(flat.score, 0.0);
        }
    }

    #[test]
    fn test_always_available() {
        let detector = PointStatisticDetector::new(2);
        assert!(detector.availability().is_ok());
        assert_eq!(detector.tier(), Tier::PointStatistic);
    }
}
