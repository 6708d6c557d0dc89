//! Anomaly scoring error types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Tier;

/// Coarse error classification used by the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing timestamp column or no feature columns.
    Schema,
    /// An optional detection tier is not present in this build or was disabled.
    DependencyUnavailable,
    /// A detector failed while fitting or scoring valid data.
    DetectorRuntime,
    /// The dataset could not be read or the result could not be written.
    Io,
    /// Invalid configuration.
    Config,
}

/// Anomaly scoring errors.
#[derive(Debug, Clone, Error)]
pub enum AnomalyError {
    #[error("Schema error: timestamp column '{column}' not found (available: {})", available.join(", "))]
    MissingTimestampColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Schema error: no feature columns besides timestamp column '{timestamp_column}'")]
    NoFeatureColumns { timestamp_column: String },

    #[error("Dependency unavailable: {tier} tier - {reason}")]
    DependencyUnavailable { tier: Tier, reason: String },

    #[error("Detector error in {tier} tier: {reason}")]
    DetectorRuntime { tier: Tier, reason: String },

    #[error("I/O error on {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AnomalyError {
    /// Build an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a runtime error raised by a detector.
    pub fn runtime(tier: Tier, reason: impl Into<String>) -> Self {
        Self::DetectorRuntime {
            tier,
            reason: reason.into(),
        }
    }

    /// Build an unavailability error for a tier.
    pub fn unavailable(tier: Tier, reason: impl Into<String>) -> Self {
        Self::DependencyUnavailable {
            tier,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTimestampColumn { .. } | Self::NoFeatureColumns { .. } => ErrorKind::Schema,
            Self::DependencyUnavailable { .. } => ErrorKind::DependencyUnavailable,
            Self::DetectorRuntime { .. } => ErrorKind::DetectorRuntime,
            Self::Io { .. } | Self::MalformedTable(_) => ErrorKind::Io,
            Self::InvalidParameter { .. } => ErrorKind::Config,
        }
    }

    /// Fatal errors abort the run; the rest trigger a fallback.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::DependencyUnavailable | ErrorKind::DetectorRuntime
        )
    }
}

/// Result type for anomaly scoring operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
