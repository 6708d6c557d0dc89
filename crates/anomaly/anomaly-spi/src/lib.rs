//! Anomaly Scoring Service Provider Interface
//!
//! Defines the detector and observer contracts, the error taxonomy and the
//! data model shared by every detection tier.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{RunObserver, SilentObserver, TierDetector};
pub use error::{AnomalyError, ErrorKind, Result};
pub use model::{
    AnomalyResult, BucketSummary, Dataset, DegradeEvent, DegradeScope, Feature,
    FeatureStatistics, FeatureStats, Method, RunSummary, SubScore, Tier, TierOutput,
};
