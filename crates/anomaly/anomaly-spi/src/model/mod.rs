//! Data models for anomaly scoring.
//!
//! This module contains data structures used throughout the scoring engine.

mod anomaly_result;
mod dataset;
mod degrade;
mod method;
mod statistics;
mod summary;

pub use anomaly_result::{AnomalyResult, SubScore, TierOutput};
pub use dataset::{Dataset, Feature};
pub use degrade::{DegradeEvent, DegradeScope};
pub use method::{Method, Tier};
pub use statistics::{FeatureStatistics, FeatureStats};
pub use summary::{BucketSummary, RunSummary};
