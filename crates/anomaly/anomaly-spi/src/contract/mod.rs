//! Contract definitions for anomaly scoring.
//!
//! This module contains trait definitions that detectors and observers implement.

mod run_observer;
mod tier_detector;

pub use run_observer::{RunObserver, SilentObserver};
pub use tier_detector::TierDetector;
