//! Detection tier implementations.
//!
//! - [`MultivariateDetector`]: joint copula-based outlier scoring
//! - [`DistributionDetector`]: per-feature interquartile distance
//! - [`PointStatisticDetector`]: per-feature z-score, the terminal tier

mod distribution;
mod multivariate;
mod point;

pub use distribution::{DistributionDetector, InterquartileTest, SATURATING_IQR_DISTANCE};
pub use multivariate::{
    impute_with_means, rescale, CopodModel, MultivariateDetector, CONTRIBUTION_Z_SCALE,
};
pub use point::{zscore_sub_score, PointStatisticDetector, SATURATING_Z};

use anomaly_api::ScoringConfig;
use anomaly_spi::{Dataset, FeatureStatistics, Result, Tier, TierDetector, TierOutput};

/// Tagged union over the three detection tiers.
#[derive(Debug, Clone)]
pub enum Detector {
    Multivariate(MultivariateDetector),
    Distribution(DistributionDetector),
    PointStatistic(PointStatisticDetector),
}

impl Detector {
    /// Build the detector for `tier`, honouring the configuration's
    /// contributor limit and disabled tiers.
    pub fn for_tier(tier: Tier, config: &ScoringConfig) -> Self {
        let k = config.max_contributors;
        let disabled = config.is_disabled(tier);
        match tier {
            Tier::Multivariate => {
                let detector = MultivariateDetector::new(k);
                Detector::Multivariate(if disabled { detector.disabled() } else { detector })
            }
            Tier::Distribution => {
                let detector = DistributionDetector::new(k);
                Detector::Distribution(if disabled { detector.disabled() } else { detector })
            }
            Tier::PointStatistic => Detector::PointStatistic(PointStatisticDetector::new(k)),
        }
    }

    fn inner(&self) -> &dyn TierDetector {
        match self {
            Detector::Multivariate(d) => d,
            Detector::Distribution(d) => d,
            Detector::PointStatistic(d) => d,
        }
    }
}

impl TierDetector for Detector {
    fn tier(&self) -> Tier {
        self.inner().tier()
    }

    fn availability(&self) -> Result<()> {
        self.inner().availability()
    }

    fn detect(&self, dataset: &Dataset, stats: &FeatureStatistics) -> Result<TierOutput> {
        self.inner().detect(dataset, stats)
    }
}
