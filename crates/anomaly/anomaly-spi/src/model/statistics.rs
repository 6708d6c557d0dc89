//! Per-feature aggregate descriptors.

use serde::{Deserialize, Serialize};

/// Aggregate descriptors of one feature over the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Population mean of the observed values.
    pub mean: f64,
    /// Population standard deviation of the observed values.
    pub std_dev: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Number of observed (non-missing) values.
    pub observed: usize,
}

impl FeatureStats {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether the feature carries no spread at all.
    pub fn is_degenerate(&self) -> bool {
        self.std_dev == 0.0
    }
}

/// Descriptors for every feature, in feature declaration order.
///
/// Computed once at the start of a run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    names: Vec<String>,
    stats: Vec<FeatureStats>,
}

impl FeatureStatistics {
    /// Pair feature names with their descriptors.
    pub fn new(entries: Vec<(String, FeatureStats)>) -> Self {
        let (names, stats) = entries.into_iter().unzip();
        Self { names, stats }
    }

    /// Descriptors by feature position.
    pub fn get(&self, index: usize) -> Option<&FeatureStats> {
        self.stats.get(index)
    }

    /// Descriptors by feature name.
    pub fn by_name(&self, name: &str) -> Option<&FeatureStats> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.stats.get(i))
    }

    /// Iterate `(name, stats)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureStats)> + '_ {
        self.names.iter().map(String::as_str).zip(self.stats.iter())
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}
