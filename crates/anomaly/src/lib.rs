//! # anomaly
//!
//! Tiered anomaly scoring for tabular time series.
//!
//! Every row of a CSV table gets a score in `[0, 100]` and its top contributing
//! features. Scoring starts at the tier the requested method names and falls
//! back down the chain multivariate → distribution → point-statistic when a
//! tier is unavailable or fails.
//!
//! ```no_run
//! use anomaly::{run, Method, ScoringConfig, TracingObserver};
//!
//! let config = ScoringConfig::new(Method::Ml);
//! let summary = run("metrics.csv", "scored.csv", &config, &TracingObserver)?;
//! println!("{} high-scoring rows", summary.buckets.high);
//! # Ok::<(), anomaly::AnomalyError>(())
//! ```

pub use anomaly_facade::*;
