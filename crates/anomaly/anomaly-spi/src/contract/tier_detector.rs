//! Detection tier trait definition.

use crate::error::Result;
use crate::model::{Dataset, FeatureStatistics, Tier, TierOutput};

/// A detection strategy that scores every row of a dataset.
///
/// Implementations must be usable from multiple threads; row scoring may be
/// parallelised once the run's feature statistics exist.
pub trait TierDetector: Send + Sync {
    /// Which tier this detector implements.
    fn tier(&self) -> Tier;

    /// Probe whether the detector can run at all in this build and
    /// configuration.
    ///
    /// Returns [`AnomalyError::DependencyUnavailable`](crate::AnomalyError::DependencyUnavailable)
    /// when it cannot.
    fn availability(&self) -> Result<()>;

    /// Score every row of `dataset`, producing exactly one result per row in
    /// row order.
    fn detect(&self, dataset: &Dataset, stats: &FeatureStatistics) -> Result<TierOutput>;
}
