//! Timestamp-indexed tabular dataset.

use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};

/// A named numeric column of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    name: String,
    column: usize,
    values: Vec<Option<f64>>,
}

impl Feature {
    /// Feature name as declared in the header.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the feature in the original header.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Values in row (time) order; `None` marks a missing value.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at a row, `None` if missing.
    pub fn value(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Iterator over the observed (non-missing) values.
    pub fn observed(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

/// Ordered rows with one timestamp column; every other column is a feature.
///
/// Original cell text is retained so the scored table reproduces the input
/// columns exactly.
///
/// Deserialization goes through [`Dataset::from_records`], so only the header,
/// records and timestamp column are read back and every check is reapplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    timestamp_column: String,
    timestamp_index: usize,
    features: Vec<Feature>,
    unparseable_cells: usize,
}

impl Dataset {
    /// Build a dataset from a header and raw records.
    ///
    /// Fails with a schema error when the timestamp column is absent or no
    /// other column exists, and with [`AnomalyError::MalformedTable`] when a
    /// record's width differs from the header.
    pub fn from_records(
        headers: Vec<String>,
        records: Vec<Vec<String>>,
        timestamp_column: &str,
    ) -> Result<Self> {
        let timestamp_index = headers
            .iter()
            .position(|h| h == timestamp_column)
            .ok_or_else(|| AnomalyError::MissingTimestampColumn {
                column: timestamp_column.to_string(),
                available: headers.clone(),
            })?;

        if headers.len() < 2 {
            return Err(AnomalyError::NoFeatureColumns {
                timestamp_column: timestamp_column.to_string(),
            });
        }

        for (i, record) in records.iter().enumerate() {
            if record.len() != headers.len() {
                return Err(AnomalyError::MalformedTable(format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    record.len(),
                    headers.len()
                )));
            }
        }

        let mut unparseable_cells = 0;
        let features = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != timestamp_index)
            .map(|(column, name)| {
                let values = records
                    .iter()
                    .map(|record| match parse_cell(&record[column]) {
                        Cell::Value(v) => Some(v),
                        Cell::Missing => None,
                        Cell::Unparseable => {
                            unparseable_cells += 1;
                            None
                        }
                    })
                    .collect();
                Feature {
                    name: name.clone(),
                    column,
                    values,
                }
            })
            .collect();

        Ok(Self {
            headers,
            records,
            timestamp_column: timestamp_column.to_string(),
            timestamp_index,
            features,
            unparseable_cells,
        })
    }

    /// Build a dataset from fully observed numeric columns.
    ///
    /// The timestamp column is placed first and filled with row indices.
    pub fn from_columns(timestamp_column: &str, columns: &[(&str, &[f64])]) -> Result<Self> {
        let rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let mut headers = vec![timestamp_column.to_string()];
        headers.extend(columns.iter().map(|(name, _)| name.to_string()));

        let records = (0..rows)
            .map(|row| {
                let mut record = vec![row.to_string()];
                record.extend(
                    columns
                        .iter()
                        .map(|(_, values)| values.get(row).map(|v| v.to_string()).unwrap_or_default()),
                );
                record
            })
            .collect();

        Self::from_records(headers, records, timestamp_column)
    }

    /// Original header, including the timestamp column.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Original cell text per row.
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Name of the timestamp column.
    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    /// Timestamp cell of each row, in row order.
    pub fn timestamps(&self) -> impl Iterator<Item = &str> + '_ {
        self.records
            .iter()
            .map(move |r| r[self.timestamp_index].as_str())
    }

    /// Feature columns in declaration order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Feature names in declaration order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Number of feature columns.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of non-empty feature cells that did not parse as a finite number.
    pub fn unparseable_cells(&self) -> usize {
        self.unparseable_cells
    }

    /// Whether any feature value is missing.
    pub fn has_missing(&self) -> bool {
        self.features
            .iter()
            .any(|f| f.values.iter().any(Option::is_none))
    }
}

#[derive(Deserialize)]
struct RawDataset {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    timestamp_column: String,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = AnomalyError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::from_records(raw.headers, raw.records, &raw.timestamp_column)
    }
}

enum Cell {
    Value(f64),
    Missing,
    Unparseable,
}

fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Missing;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" | "na" | "n/a" | "null" | "none" => return Cell::Missing,
        _ => {}
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Value(v),
        _ => Cell::Unparseable,
    }
}
