//! Distribution (interquartile-distance) detector.

use anomaly_api::DEFAULT_MAX_CONTRIBUTORS;
use anomaly_spi::{
    AnomalyError, Dataset, DegradeEvent, Feature, FeatureStatistics, FeatureStats, Result, Tier,
    TierDetector, TierOutput,
};
use tracing::{debug, warn};

use super::point::zscore_sub_score;
use crate::ranker::explain_rows;

/// Distance beyond the box, in IQRs, that saturates the sub-score.
pub const SATURATING_IQR_DISTANCE: f64 = 2.0;

/// Interquartile test over one feature's time-ordered series.
#[derive(Debug, Clone, Copy)]
pub struct InterquartileTest {
    q1: f64,
    q3: f64,
}

impl InterquartileTest {
    /// Validate a feature series against its statistics.
    ///
    /// Fails when the series has no observations or its box is not finite.
    pub fn fit(feature: &Feature, stats: &FeatureStats) -> Result<Self> {
        if stats.observed == 0 || feature.observed().next().is_none() {
            return Err(AnomalyError::runtime(
                Tier::Distribution,
                format!("feature '{}' has no observed values", feature.name()),
            ));
        }
        if !stats.q1.is_finite() || !stats.q3.is_finite() || !stats.iqr().is_finite() {
            return Err(AnomalyError::runtime(
                Tier::Distribution,
                format!(
                    "feature '{}' has a non-finite interquartile range (q1={}, q3={})",
                    feature.name(),
                    stats.q1,
                    stats.q3
                ),
            ));
        }
        Ok(Self {
            q1: stats.q1,
            q3: stats.q3,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Distance outside `[q1, q3]`, in units of IQR. Zero inside the box.
    pub fn distance(&self, value: f64) -> f64 {
        let iqr = self.iqr();
        if value < self.q1 {
            (self.q1 - value) / iqr
        } else if value > self.q3 {
            (value - self.q3) / iqr
        } else {
            0.0
        }
    }

    /// Sub-score in `[0, 100]`; zero for a missing value or a collapsed box.
    pub fn sub_score(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if self.iqr() > 0.0 => {
                (self.distance(v) * (100.0 / SATURATING_IQR_DISTANCE)).min(100.0)
            }
            _ => 0.0,
        }
    }
}

/// IQR based detector scoring each feature as an ordered series.
///
/// A feature whose series cannot be evaluated falls back to the z-score
/// formula for that feature only; the event is recorded in the tier output.
#[derive(Debug, Clone)]
pub struct DistributionDetector {
    max_contributors: usize,
    enabled: bool,
}

impl DistributionDetector {
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

    fn feature_sub_scores(feature: &Feature, stats: &FeatureStats) -> Result<Vec<f64>> {
        let test = InterquartileTest::fit(feature, stats)?;
        Ok(feature.values().iter().map(|v| test.sub_score(*v)).collect())
    }
}

impl Default for DistributionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTRIBUTORS)
    }
}

impl TierDetector for DistributionDetector {
    fn tier(&self) -> Tier {
        Tier::Distribution
    }

    fn availability(&self) -> Result<()> {
        if !cfg!(feature = "distribution") {
            return Err(AnomalyError::unavailable(
                Tier::Distribution,
                "built without the `distribution` feature",
            ));
        }
        if !self.enabled {
            return Err(AnomalyError::unavailable(
                Tier::Distribution,
                "disabled by configuration",
            ));
        }
        Ok(())
    }

    fn detect(&self, dataset: &Dataset, stats: &FeatureStatistics) -> Result<TierOutput> {
        debug!(rows = dataset.row_count(), "distribution scoring");

        let mut events = Vec::new();
        let columns: Vec<Vec<f64>> = dataset
            .features()
            .iter()
            .enumerate()
            .map(|(j, feature)| {
                let feature_stats = stats.get(j).copied().unwrap_or_default();
                match Self::feature_sub_scores(feature, &feature_stats) {
                    Ok(scores) => scores,
                    Err(err) => {
                        warn!(feature = feature.name(), error = %err, "feature degraded to point statistics");
                        events.push(DegradeEvent::feature(
                            Tier::Distribution,
                            Tier::PointStatistic,
                            feature.name(),
                            &err,
                        ));
                        feature
                            .values()
                            .iter()
                            .map(|v| zscore_sub_score(*v, &feature_stats))
                            .collect()
                    }
                }
            })
            .collect();

        let results = explain_rows(
            &dataset.feature_names(),
            dataset.row_count(),
            self.max_contributors,
            |row, j| columns[j][row],
            None::<fn(usize) -> f64>,
        );

        Ok(TierOutput::new(Tier::Distribution, results).with_events(events))
    }
}
