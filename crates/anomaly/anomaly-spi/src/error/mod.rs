//! Error types for anomaly scoring.
//!
//! This module contains the error enum, its classification and the Result alias.

mod anomaly_error;

pub use anomaly_error::{AnomalyError, ErrorKind, Result};
