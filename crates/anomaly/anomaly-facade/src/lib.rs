//! Anomaly Scoring Facade
//!
//! Unified re-exports for the anomaly scoring module.
//!
//! This facade provides a single entry point to all scoring functionality:
//! - `TierDetector` and `RunObserver` contracts, data model and errors from SPI
//! - `ScoringConfig` and output constants from API
//! - Detectors, the fallback chain and the `run` driver from Core

// Re-export everything from SPI
pub use anomaly_spi::*;

// Re-export everything from API
pub use anomaly_api::*;

// Re-export everything from Core
pub use anomaly_core::*;
