//! Result assembly: merge scores back into the original table.

use std::io::Write;

use anomaly_api::{BucketThresholds, CONTRIBUTORS_COLUMN, SCORE_COLUMN};
use anomaly_spi::{AnomalyError, AnomalyResult, BucketSummary, Dataset, Result};

use crate::ranker::format_contributors;

/// Render a row score with one decimal place.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Count rows per bucket and find the maximum score.
pub fn bucket_summary(scores: &[f64], thresholds: &BucketThresholds) -> BucketSummary {
    let mut summary = BucketSummary {
        total_rows: scores.len(),
        ..BucketSummary::default()
    };
    for &score in scores {
        if score > thresholds.high {
            summary.high += 1;
        } else if score > thresholds.medium {
            summary.medium += 1;
        } else {
            summary.low += 1;
        }
        summary.max_score = summary.max_score.max(score);
    }
    summary
}

/// The original table with score and contributor columns appended.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    results: Vec<AnomalyResult>,
}

impl ScoredTable {
    /// Pair each dataset row with its result. Row counts must match.
    pub fn assemble(dataset: &Dataset, results: Vec<AnomalyResult>) -> Result<Self> {
        if results.len() != dataset.row_count() {
            return Err(AnomalyError::MalformedTable(format!(
                "{} results for {} rows",
                results.len(),
                dataset.row_count()
            )));
        }
        Ok(Self {
            headers: dataset.headers().to_vec(),
            records: dataset.records().to_vec(),
            results,
        })
    }

    /// Output header: original columns, then score and contributors.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        headers.push(SCORE_COLUMN.to_string());
        headers.push(CONTRIBUTORS_COLUMN.to_string());
        headers
    }

    /// Output rows in original order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records
            .iter()
            .zip(&self.results)
            .map(|(record, result)| {
                let mut row = record.clone();
                row.push(format_score(result.score));
                row.push(format_contributors(&result.contributors));
                row
            })
    }

    /// Per-row results.
    pub fn results(&self) -> &[AnomalyResult] {
        &self.results
    }

    /// Unrounded row scores.
    pub fn scores(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.score).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Bucket summary over the unrounded scores.
    pub fn summary(&self, thresholds: &BucketThresholds) -> BucketSummary {
        bucket_summary(&self.scores(), thresholds)
    }

    /// Write the table as CSV.
    ///
    /// Errors come from the underlying writer; callers attach the
    /// destination.
    pub fn write_csv<W: Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.headers())?;
        for row in self.rows() {
            csv_writer.write_record(&row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
