//! Multivariate (copula-based) outlier detector.
//!
//! The headline score comes from COPOD, a parameter-free model built on the
//! empirical copula of the feature matrix: each cell's tail probability is
//! estimated from its column's empirical CDF, and a row's outlierness is the
//! sum of negative log tail probabilities across columns. The model is fully
//! deterministic.

use anomaly_api::DEFAULT_MAX_CONTRIBUTORS;
use anomaly_spi::{
    AnomalyError, Dataset, FeatureStatistics, Result, Tier, TierDetector, TierOutput,
};
use tracing::debug;

use crate::ranker::explain_rows;
use crate::statistics::mean_std;

/// Contribution points per unit of z-score.
pub const CONTRIBUTION_Z_SCALE: f64 = 25.0;

/// Fitted copula-based outlier model.
///
/// Columns are stored column-major; every column has the same length.
#[derive(Debug, Clone)]
pub struct CopodModel {
    decision_scores: Vec<f64>,
}

impl CopodModel {
    /// Fit the model on a complete (imputed) matrix and score its rows.
    pub fn fit(columns: &[Vec<f64>]) -> Result<Self> {
        let rows = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != rows) {
            return Err(AnomalyError::runtime(
                Tier::Multivariate,
                "feature matrix columns have unequal lengths",
            ));
        }
        if columns.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AnomalyError::runtime(
                Tier::Multivariate,
                "feature matrix contains non-finite values",
            ));
        }

        let mut decision_scores = vec![0.0; rows];
        for column in columns {
            for (row, o) in column_outlierness(column).into_iter().enumerate() {
                decision_scores[row] += o;
            }
        }

        if decision_scores.iter().any(|s| !s.is_finite()) {
            return Err(AnomalyError::runtime(
                Tier::Multivariate,
                "model produced non-finite decision scores",
            ));
        }
        Ok(Self { decision_scores })
    }

    /// Raw decision score per row; larger is more anomalous.
    pub fn decision_scores(&self) -> &[f64] {
        &self.decision_scores
    }
}

fn column_outlierness(column: &[f64]) -> Vec<f64> {
    let n = column.len() as f64;
    let mut sorted = column.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let skew = skewness(column);

    column
        .iter()
        .map(|&x| {
            // ECDF(x) = #{x_j <= x} / n and ECDF(-x) over the negated column.
            let at_or_below = sorted.partition_point(|&v| v <= x) as f64;
            let at_or_above = (sorted.len() - sorted.partition_point(|&v| v < x)) as f64;
            let left = -(at_or_below / n).ln();
            let right = -(at_or_above / n).ln();

            let skewed = match skew {
                s if s < 0.0 => left,
                s if s > 0.0 => right,
                _ => left + right,
            };
            skewed.max((left + right) / 2.0)
        })
        .collect()
}

/// Population (biased) sample skewness; zero for a column without spread.
fn skewness(column: &[f64]) -> f64 {
    if column.is_empty() {
        return 0.0;
    }
    let n = column.len() as f64;
    let mean = column.iter().sum::<f64>() / n;
    let m2 = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let m3 = column.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n;
    if m2 <= 0.0 {
        0.0
    } else {
        m3 / m2.powf(1.5)
    }
}

/// Linearly map scores onto `[0, 100]` using the observed range.
///
/// Every score maps to 0 when the range is empty.
pub fn rescale(scores: &[f64]) -> Vec<f64> {
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if scores.is_empty() || max <= min {
        return vec![0.0; scores.len()];
    }
    scores
        .iter()
        .map(|s| ((s - min) / (max - min) * 100.0).clamp(0.0, 100.0))
        .collect()
}

/// Replace missing values with the feature's dataset-wide mean.
pub fn impute_with_means(dataset: &Dataset, stats: &FeatureStatistics) -> Result<Vec<Vec<f64>>> {
    dataset
        .features()
        .iter()
        .enumerate()
        .map(|(j, feature)| {
            let observed = stats.get(j).map_or(0, |s| s.observed);
            if observed == 0 {
                return Err(AnomalyError::runtime(
                    Tier::Multivariate,
                    format!("feature '{}' has no observed values to impute from", feature.name()),
                ));
            }
            let mean = stats.get(j).map_or(0.0, |s| s.mean);
            Ok(feature.values().iter().map(|v| v.unwrap_or(mean)).collect())
        })
        .collect()
}

/// Joint, dependence-aware detector over all features at once.
///
/// Contributor sub-scores are feature-local z-scores of the imputed matrix,
/// independent of the joint headline score.
#[derive(Debug, Clone)]
pub struct MultivariateDetector {
    max_contributors: usize,
    enabled: bool,
}

impl MultivariateDetector {
    /// Create a new detector reporting up to `max_contributors` per row.
    pub fn new(max_contributors: usize) -> Self {
        Self {
            max_contributors,
            enabled: true,
        }
    }

    /// Mark the detector unavailable for this run.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl Default for MultivariateDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTRIBUTORS)
    }
}

impl TierDetector for MultivariateDetector {
    fn tier(&self) -> Tier {
        Tier::Multivariate
    }

    fn availability(&self) -> Result<()> {
        if !cfg!(feature = "multivariate") {
            return Err(AnomalyError::unavailable(
                Tier::Multivariate,
                "built without the `multivariate` feature",
            ));
        }
        if !self.enabled {
            return Err(AnomalyError::unavailable(
                Tier::Multivariate,
                "disabled by configuration",
            ));
        }
        Ok(())
    }

    fn detect(&self, dataset: &Dataset, stats: &FeatureStatistics) -> Result<TierOutput> {
        let columns = impute_with_means(dataset, stats)?;
        if dataset.has_missing() {
            debug!("imputed missing values with feature means");
        }

        let model = CopodModel::fit(&columns)?;
        let scores = rescale(model.decision_scores());
        debug!(rows = scores.len(), "multivariate model fitted");

        let moments: Vec<(f64, f64)> = columns.iter().map(|c| mean_std(c)).collect();
        let results = explain_rows(
            &dataset.feature_names(),
            dataset.row_count(),
            self.max_contributors,
            |row, j| {
                let (mean, std) = moments[j];
                if std > 0.0 {
                    let z = ((columns[j][row] - mean) / std).abs();
                    (z * CONTRIBUTION_Z_SCALE).min(100.0)
                } else {
                    0.0
                }
            },
            Some(|row: usize| scores[row]),
        );

        Ok(TierOutput::new(Tier::Multivariate, results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::compute_statistics;

    #[test]
    fn test_rescale_min_max() {
        assert_eq!(rescale(&[1.0, 2.0, 3.0]), vec![0.0, 50.0, 100.0]);
        assert_eq!(rescale(&[4.0, 4.0]), vec![0.0, 0.0]);
        assert_eq!(rescale(&[7.5]), vec![0.0]);
        assert!(rescale(&[]).is_empty());
    }

    #[test]
    fn test_skewness_sign() {
        assert!(skewness(&[1.0, 1.0, 1.0, 10.0]) > 0.0);
        assert!(skewness(&[-10.0, 1.0, 1.0, 1.0]) < 0.0);
        assert_eq!(skewness(&[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_copod_ranks_extreme_row_highest() {
        let columns = vec![
            vec![10.0, 11.0, 9.0, 10.5, 50.0, 10.2],
            vec![1.0, 1.1, 0.9, 1.05, 5.0, 1.02],
        ];
        let model = CopodModel::fit(&columns).unwrap();
        let scores = model.decision_scores();
        let top = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(top, 4);
    }

    #[test]
    fn test_copod_single_row_is_flat() {
        let model = CopodModel::fit(&[vec![3.0], vec![-2.0]]).unwrap();
        assert_eq!(rescale(model.decision_scores()), vec![0.0]);
    }

    #[test]
    fn test_copod_rejects_non_finite() {
        let err = CopodModel::fit(&[vec![1.0, f64::NAN]]).unwrap_err();
        assert!(matches!(err, AnomalyError::DetectorRuntime { tier: Tier::Multivariate, .. }));
    }

    #[test]
    fn test_copod_is_deterministic() {
        let columns = vec![vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]];
        let a = CopodModel::fit(&columns).unwrap();
        let b = CopodModel::fit(&columns).unwrap();
        assert_eq!(a.decision_scores(), b.decision_scores());
    }

    #[test]
    fn test_impute_with_means() {
        let dataset = Dataset::from_records(
            vec!["timestamp".into(), "cpu".into()],
            vec![
                vec!["t0".into(), "2".into()],
                vec!["t1".into(), "".into()],
                vec!["t2".into(), "4".into()],
            ],
            "timestamp",
        )
        .unwrap();
        let stats = compute_statistics(&dataset).unwrap();
        let columns = impute_with_means(&dataset, &stats).unwrap();
        assert_eq!(columns, vec![vec![2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_detect_unobserved_feature_fails() {
        let dataset = Dataset::from_records(
            vec!["timestamp".into(), "cpu".into(), "gone".into()],
            vec![vec!["t0".into(), "1".into(), "".into()]],
            "timestamp",
        )
        .unwrap();
        let stats = compute_statistics(&dataset).unwrap();
        let err = MultivariateDetector::default().detect(&dataset, &stats).unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_detect_scores_in_range_with_local_contributors() {
        let dataset = Dataset::from_columns(
            "timestamp",
            &[
                ("cpu", &[10.0, 11.0, 9.0, 10.5, 50.0, 10.2]),
                ("mem", &[20.0, 21.0, 19.0, 20.5, 30.0, 20.2]),
                ("flat", &[7.0, 7.0, 7.0, 7.0, 7.0, 7.0]),
            ],
        )
        .unwrap();
        let stats = compute_statistics(&dataset).unwrap();
        let output = MultivariateDetector::default().detect(&dataset, &stats).unwrap();

        assert!(output.results.iter().all(|r| (0.0..=100.0).contains(&r.score)));
        assert_eq!(output.results[4].score, 100.0);
        assert_eq!(output.results[4].top_feature(), Some("cpu"));
        for result in &output.results {
            assert_eq!(result.contributors.len(), 3);
            let flat = result.contributors.iter().find(|c| c.feature == "flat").unwrap();
            assert_eq!(flat.score, 0.0);
        }
    }

    #[test]
    fn test_single_row_scores_zero() {
        let dataset = Dataset::from_columns("timestamp", &[("cpu", &[42.0]), ("mem", &[1.0])]).unwrap();
        let stats = compute_statistics(&dataset).unwrap();
        let output = MultivariateDetector::default().detect(&dataset, &stats).unwrap();
        assert_eq!(output.scores(), vec![0.0]);
    }
}
