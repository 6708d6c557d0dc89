//! Fallback chain controller.
//!
//! Maps a requested method to its entry tier and walks the degrade sequence
//! Multivariate → Distribution → Point-Statistic. Each detector is tried at
//! most once; transitions only move down the chain.

use anomaly_api::ScoringConfig;
use anomaly_spi::{
    AnomalyError, AnomalyResult, Dataset, DegradeEvent, FeatureStatistics, Method, Result,
    RunObserver, Tier, TierDetector,
};
use tracing::{info, warn};

use crate::detectors::Detector;

/// Result of walking the chain for one run.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// Tier that produced the results.
    pub tier: Tier,
    /// One result per row, in row order.
    pub results: Vec<AnomalyResult>,
    /// Every transition taken, whole-detector and per-feature, in order.
    pub degrade_log: Vec<DegradeEvent>,
}

/// Prioritized list of detectors starting at the requested method's tier.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    method: Method,
    detectors: Vec<Detector>,
}

impl FallbackChain {
    /// Build the chain for the configured method.
    pub fn new(config: &ScoringConfig) -> Self {
        let mut detectors = Vec::new();
        let mut tier = Some(config.method.entry_tier());
        while let Some(t) = tier {
            detectors.push(Detector::for_tier(t, config));
            tier = t.next();
        }
        Self {
            method: config.method,
            detectors,
        }
    }

    /// Requested method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Tiers in the order they will be attempted.
    pub fn tiers(&self) -> Vec<Tier> {
        self.detectors.iter().map(TierDetector::tier).collect()
    }

    /// Score the dataset with the first detector that is available and
    /// succeeds.
    ///
    /// Non-fatal errors move to the next tier and are reported through
    /// tracing, `observer` and the returned degrade log. Fatal errors are
    /// returned unchanged.
    pub fn run(
        &self,
        dataset: &Dataset,
        stats: &FeatureStatistics,
        observer: &dyn RunObserver,
    ) -> Result<ChainOutcome> {
        let mut degrade_log = Vec::new();

        for (i, detector) in self.detectors.iter().enumerate() {
            let tier = detector.tier();
            let attempt = detector
                .availability()
                .and_then(|()| detector.detect(dataset, stats));

            match attempt {
                Ok(output) => {
                    for event in &output.events {
                        observer.on_line(&event.to_string());
                    }
                    degrade_log.extend(output.events);
                    info!(%tier, rows = output.results.len(), "scoring complete");
                    return Ok(ChainOutcome {
                        tier,
                        results: output.results,
                        degrade_log,
                    });
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    let Some(next) = self.detectors.get(i + 1) else {
                        return Err(err);
                    };
                    let event = DegradeEvent::detector(tier, next.tier(), &err);
                    warn!(from = %tier, to = %next.tier(), error = %err, "detector degraded");
                    observer.on_line(&event.to_string());
                    degrade_log.push(event);
                }
            }
        }

        Err(AnomalyError::runtime(
            self.method.entry_tier(),
            "fallback chain has no detectors",
        ))
    }
}
