//! Run-level summaries.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{DegradeEvent, Method, Tier};

/// Coarse distribution of row scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Rows scoring above the high threshold.
    pub high: usize,
    /// Rows scoring above the medium threshold, up to and including the high one.
    pub medium: usize,
    /// Rows scoring at or below the medium threshold.
    pub low: usize,
    /// Largest row score, 0 for an empty table.
    pub max_score: f64,
    pub total_rows: usize,
}

/// Outcome of a successful detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Method the caller asked for.
    pub method: Method,
    /// Tier that actually produced the scores.
    pub tier: Tier,
    pub buckets: BucketSummary,
    /// Every degrade transition taken during the run, in order.
    pub degrade_log: Vec<DegradeEvent>,
    /// Where the scored table was written, if it was.
    pub output: Option<PathBuf>,
}

impl RunSummary {
    /// Whether the run finished on a lower tier than requested.
    pub fn degraded(&self) -> bool {
        self.tier != self.method.entry_tier()
    }
}
