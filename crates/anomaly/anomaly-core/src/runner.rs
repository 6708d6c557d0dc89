//! Run driver: load, score, assemble and write one dataset.

use std::path::Path;

use anomaly_api::ScoringConfig;
use anomaly_spi::{Dataset, DegradeEvent, Result, RunObserver, RunSummary, Tier};
use tracing::{info, warn};

use crate::assembler::ScoredTable;
use crate::chain::FallbackChain;
use crate::statistics::compute_statistics;
use crate::table::{load_dataset, write_atomic};

/// A scored dataset that has not been written anywhere yet.
#[derive(Debug, Clone)]
pub struct ScoredRun {
    pub table: ScoredTable,
    /// Tier that produced the scores.
    pub tier: Tier,
    pub degrade_log: Vec<DegradeEvent>,
}

impl ScoredRun {
    /// Summarize this run for `config`.
    pub fn summary(&self, config: &ScoringConfig) -> RunSummary {
        RunSummary {
            method: config.method,
            tier: self.tier,
            buckets: self.table.summary(&config.buckets),
            degrade_log: self.degrade_log.clone(),
            output: None,
        }
    }
}

/// Score an in-memory dataset.
///
/// Statistics are computed once, then the fallback chain for the configured
/// method scores every row.
pub fn score_dataset(
    dataset: &Dataset,
    config: &ScoringConfig,
    observer: &dyn RunObserver,
) -> Result<ScoredRun> {
    config.validate()?;

    observer.on_line(&format!(
        "Analyzing {} features: {}",
        dataset.feature_count(),
        dataset.feature_names().join(", ")
    ));
    let stats = compute_statistics(dataset)?;
    observer.on_progress(30);

    let chain = FallbackChain::new(config);
    info!(method = %chain.method(), tiers = ?chain.tiers(), "running detectors");
    let outcome = chain.run(dataset, &stats, observer)?;
    observer.on_progress(80);

    let table = ScoredTable::assemble(dataset, outcome.results)?;
    Ok(ScoredRun {
        table,
        tier: outcome.tier,
        degrade_log: outcome.degrade_log,
    })
}

/// Detect anomalies in the CSV at `input` and write the scored table to
/// `output`.
///
/// Schema and configuration problems fail before any detector runs, and
/// nothing is written on failure. `observer` receives progress, diagnostic
/// lines and exactly one completion callback.
pub fn run(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ScoringConfig,
    observer: &dyn RunObserver,
) -> Result<RunSummary> {
    let outcome = run_inner(input.as_ref(), output.as_ref(), config, observer);
    observer.on_complete(&outcome);
    outcome
}

fn run_inner(
    input: &Path,
    output: &Path,
    config: &ScoringConfig,
    observer: &dyn RunObserver,
) -> Result<RunSummary> {
    observer.on_progress(0);
    config.validate()?;

    info!(input = %input.display(), method = %config.method, "starting detection");
    observer.on_line(&format!("Using method: {}", config.method));

    let dataset = load_dataset(input, &config.timestamp_column)?;
    observer.on_line(&format!(
        "Loaded {} rows, {} columns",
        dataset.row_count(),
        dataset.headers().len()
    ));
    if dataset.unparseable_cells() > 0 {
        warn!(cells = dataset.unparseable_cells(), "non-numeric feature cells treated as missing");
        observer.on_line(&format!(
            "Warning: {} non-numeric cells treated as missing",
            dataset.unparseable_cells()
        ));
    }
    observer.on_progress(20);

    let scored = score_dataset(&dataset, config, observer)?;

    write_atomic(output, &scored.table)?;
    observer.on_progress(95);

    let mut summary = scored.summary(config);
    summary.output = Some(output.to_path_buf());

    let buckets = &summary.buckets;
    observer.on_line(&format!("Scored with {} tier", summary.tier));
    observer.on_line(&format!(
        "High anomalies (>{}): {}",
        config.buckets.high, buckets.high
    ));
    observer.on_line(&format!(
        "Medium anomalies ({}-{}): {}",
        config.buckets.medium, config.buckets.high, buckets.medium
    ));
    observer.on_line(&format!(
        "Low anomalies (<={}): {}",
        config.buckets.medium, buckets.low
    ));
    observer.on_line(&format!("Max score: {:.1}", buckets.max_score));
    observer.on_line(&format!("Results saved to {}", output.display()));
    observer.on_progress(100);

    info!(
        tier = %summary.tier,
        rows = buckets.total_rows,
        high = buckets.high,
        degraded = summary.degraded(),
        "detection finished"
    );
    Ok(summary)
}
