//! Anomaly Scoring API
//!
//! Configuration types and builders for anomaly scoring runs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{
    AnomalyError, AnomalyResult, BucketSummary, Dataset, DegradeEvent, ErrorKind, Method,
    Result, RunSummary, SubScore, Tier,
};

/// Column holding the rounded row score in the output table.
pub const SCORE_COLUMN: &str = "anomaly_score_0_100";

/// Column holding the formatted contributor list in the output table.
pub const CONTRIBUTORS_COLUMN: &str = "top_contributors";

/// Timestamp column name used when none is configured.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "timestamp";

/// Number of contributors reported per row when none is configured.
pub const DEFAULT_MAX_CONTRIBUTORS: usize = 3;

// ============================================================================
// Bucket Thresholds
// ============================================================================

/// Score boundaries for the high / medium / low summary buckets.
///
/// A score strictly above `high` is high, strictly above `medium` (and not
/// high) is medium, everything else is low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            high: 70.0,
            medium: 30.0,
        }
    }
}

impl BucketThresholds {
    pub fn new(high: f64, medium: f64) -> Self {
        Self { high, medium }
    }
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Configuration for one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Requested method (default: adtk-style).
    pub method: Method,
    /// Name of the timestamp column (default: "timestamp").
    pub timestamp_column: String,
    /// Contributors reported per row (default: 3).
    pub max_contributors: usize,
    /// Summary bucket boundaries (default: 70 / 30).
    pub buckets: BucketThresholds,
    /// Tiers treated as unavailable for this run, as if their backing
    /// implementation were absent.
    pub disabled_tiers: Vec<Tier>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            max_contributors: DEFAULT_MAX_CONTRIBUTORS,
            buckets: BucketThresholds::default(),
            disabled_tiers: Vec::new(),
        }
    }
}

impl ScoringConfig {
    /// Create a configuration for the given method with all other defaults.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Start a builder.
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::new()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AnomalyError::io(path, e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AnomalyError::InvalidParameter {
                name: "config".to_string(),
                reason: format!("{}: {}", path.display(), e),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a tier has been disabled for this run.
    pub fn is_disabled(&self, tier: Tier) -> bool {
        self.disabled_tiers.contains(&tier)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_column.is_empty() {
            return Err(AnomalyError::InvalidParameter {
                name: "timestamp_column".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_contributors == 0 {
            return Err(AnomalyError::InvalidParameter {
                name: "max_contributors".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let BucketThresholds { high, medium } = self.buckets;
        if !(0.0..=100.0).contains(&medium) || !(0.0..=100.0).contains(&high) || medium > high {
            return Err(AnomalyError::InvalidParameter {
                name: "buckets".to_string(),
                reason: format!(
                    "need 0 <= medium <= high <= 100, got medium={} high={}",
                    medium, high
                ),
            });
        }
        if self.is_disabled(Tier::PointStatistic) {
            return Err(AnomalyError::InvalidParameter {
                name: "disabled_tiers".to_string(),
                reason: "the point-statistic tier cannot be disabled".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for ScoringConfig.
#[derive(Debug, Default)]
pub struct ScoringConfigBuilder {
    method: Option<Method>,
    timestamp_column: Option<String>,
    max_contributors: Option<usize>,
    buckets: Option<BucketThresholds>,
    disabled_tiers: Vec<Tier>,
}

impl ScoringConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the timestamp column.
    pub fn timestamp_column(mut self, column: &str) -> Self {
        self.timestamp_column = Some(column.to_string());
        self
    }

    /// Set the number of contributors per row.
    pub fn max_contributors(mut self, n: usize) -> Self {
        self.max_contributors = Some(n);
        self
    }

    /// Set the bucket thresholds.
    pub fn buckets(mut self, buckets: BucketThresholds) -> Self {
        self.buckets = Some(buckets);
        self
    }

    /// Treat a tier as unavailable.
    pub fn disable(mut self, tier: Tier) -> Self {
        if !self.disabled_tiers.contains(&tier) {
            self.disabled_tiers.push(tier);
        }
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ScoringConfig> {
        let defaults = ScoringConfig::default();
        let config = ScoringConfig {
            method: self.method.unwrap_or(defaults.method),
            timestamp_column: self.timestamp_column.unwrap_or(defaults.timestamp_column),
            max_contributors: self.max_contributors.unwrap_or(defaults.max_contributors),
            buckets: self.buckets.unwrap_or(defaults.buckets),
            disabled_tiers: self.disabled_tiers,
        };
        config.validate()?;
        Ok(config)
    }
}
