//! Detection tiers and the method names that select them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnomalyError;

/// One of the three interchangeable detection strategies.
///
/// Tiers are ordered from most to least capable; degradation only ever moves
/// towards [`Tier::PointStatistic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Joint copula-based outlier scoring across all features.
    Multivariate,
    /// Per-feature interquartile-distance scoring.
    Distribution,
    /// Per-feature z-score scoring. Always available.
    PointStatistic,
}

impl Tier {
    /// The tier this one degrades to, or `None` for the terminal tier.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Multivariate => Some(Tier::Distribution),
            Tier::Distribution => Some(Tier::PointStatistic),
            Tier::PointStatistic => None,
        }
    }

    /// Whether this tier is the end of the degrade chain.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// The method name that enters the chain at this tier.
    pub fn method(self) -> Method {
        match self {
            Tier::Multivariate => Method::Ml,
            Tier::Distribution => Method::AdtkStyle,
            Tier::PointStatistic => Method::Statistical,
        }
    }

    /// Human readable tier name.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Multivariate => "multivariate",
            Tier::Distribution => "distribution",
            Tier::PointStatistic => "point-statistic",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested detection method, as named by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "ml")]
    Ml,
    #[default]
    #[serde(rename = "adtk-style", alias = "adtk")]
    AdtkStyle,
    #[serde(rename = "statistical")]
    Statistical,
}

impl Method {
    /// All methods in chain order.
    pub const ALL: [Method; 3] = [Method::Ml, Method::AdtkStyle, Method::Statistical];

    /// The tier the chain starts at for this method.
    pub fn entry_tier(self) -> Tier {
        match self {
            Method::Ml => Tier::Multivariate,
            Method::AdtkStyle => Tier::Distribution,
            Method::Statistical => Tier::PointStatistic,
        }
    }

    /// Canonical method identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Ml => "ml",
            Method::AdtkStyle => "adtk-style",
            Method::Statistical => "statistical",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AnomalyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(Method::Ml),
            "adtk-style" | "adtk" => Ok(Method::AdtkStyle),
            "statistical" => Ok(Method::Statistical),
            other => Err(AnomalyError::InvalidParameter {
                name: "method".to_string(),
                reason: format!("unknown method '{}', expected ml, adtk-style or statistical", other),
            }),
        }
    }
}
