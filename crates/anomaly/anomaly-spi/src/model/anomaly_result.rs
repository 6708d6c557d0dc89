//! Per-row scoring result types.

use serde::{Deserialize, Serialize};

use super::{DegradeEvent, Tier};

/// A per-feature anomaly contribution in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub feature: String,
    pub score: f64,
}

impl SubScore {
    pub fn new(feature: impl Into<String>, score: f64) -> Self {
        Self {
            feature: feature.into(),
            score,
        }
    }
}

/// Headline score and ranked explanation for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Row score in `[0, 100]`.
    pub score: f64,
    /// Top contributors, descending by sub-score.
    pub contributors: Vec<SubScore>,
}

impl AnomalyResult {
    /// Create a new anomaly result.
    pub fn new(score: f64, contributors: Vec<SubScore>) -> Self {
        Self {
            score,
            contributors,
        }
    }

    /// Name of the strongest contributor, if any.
    pub fn top_feature(&self) -> Option<&str> {
        self.contributors.first().map(|c| c.feature.as_str())
    }
}

/// Output of a single tier over a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierOutput {
    /// Tier that produced the results.
    pub tier: Tier,
    /// One result per row, in row order.
    pub results: Vec<AnomalyResult>,
    /// Degrade events raised inside the tier (per-feature fallbacks).
    pub events: Vec<DegradeEvent>,
}

impl TierOutput {
    pub fn new(tier: Tier, results: Vec<AnomalyResult>) -> Self {
        Self {
            tier,
            results,
            events: Vec::new(),
        }
    }

    /// Attach degrade events.
    pub fn with_events(mut self, events: Vec<DegradeEvent>) -> Self {
        self.events = events;
        self
    }

    /// Row scores in row order.
    pub fn scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.score).collect()
    }
}
