//! Degrade log entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Tier;
use crate::error::{AnomalyError, ErrorKind};

/// What a degrade transition applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DegradeScope {
    /// The whole detector was replaced by the next tier.
    Detector,
    /// A single feature fell back to the point-statistic formula.
    Feature { name: String },
}

/// A non-fatal transition from one tier to a lower one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradeEvent {
    pub from: Tier,
    pub to: Tier,
    pub scope: DegradeScope,
    pub cause: ErrorKind,
    pub reason: String,
}

impl DegradeEvent {
    /// Whole-detector degrade caused by `error`.
    pub fn detector(from: Tier, to: Tier, error: &AnomalyError) -> Self {
        Self {
            from,
            to,
            scope: DegradeScope::Detector,
            cause: error.kind(),
            reason: error.to_string(),
        }
    }

    /// Single-feature degrade caused by `error`.
    pub fn feature(from: Tier, to: Tier, name: impl Into<String>, error: &AnomalyError) -> Self {
        Self {
            from,
            to,
            scope: DegradeScope::Feature { name: name.into() },
            cause: error.kind(),
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for DegradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            DegradeScope::Detector => write!(
                f,
                "{} detector degraded to {}: {}",
                self.from, self.to, self.reason
            ),
            DegradeScope::Feature { name } => write!(
                f,
                "{} feature '{}' degraded to {}: {}",
                self.from, name, self.to, self.reason
            ),
        }
    }
}
