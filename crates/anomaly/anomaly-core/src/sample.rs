//! Built-in sample dataset: hourly host metrics with a load spike.

use std::path::Path;

use anomaly_spi::{AnomalyError, Dataset, Result};

/// Sixteen hourly rows; hours 11 to 13 form a spike across every metric.
pub const SAMPLE_CSV: &str = "timestamp,cpu_usage,memory_usage,network_io,disk_io,temperature
2024-01-01 00:00:00,45.2,62.1,1024,512,68.5
2024-01-01 01:00:00,42.8,58.9,1156,489,67.2
2024-01-01 02:00:00,41.5,55.7,1089,501,66.8
2024-01-01 03:00:00,39.2,52.3,965,478,65.9
2024-01-01 04:00:00,38.1,51.1,892,445,65.2
2024-01-01 05:00:00,37.5,50.8,823,432,64.8
2024-01-01 06:00:00,46.8,65.2,1245,567,69.1
2024-01-01 07:00:00,52.1,71.3,1456,634,71.2
2024-01-01 08:00:00,58.9,78.5,1678,712,73.4
2024-01-01 09:00:00,61.2,82.1,1834,789,74.8
2024-01-01 10:00:00,63.5,85.3,1945,823,76.1
2024-01-01 11:00:00,95.8,97.2,3456,1567,89.2
2024-01-01 12:00:00,97.1,98.8,3678,1689,91.5
2024-01-01 13:00:00,94.2,96.5,3234,1456,88.7
2024-01-01 14:00:00,65.3,86.7,1978,834,76.8
2024-01-01 15:00:00,62.8,84.2,1823,798,75.3
";

/// Write [`SAMPLE_CSV`] to `path`.
pub fn write_sample(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, SAMPLE_CSV).map_err(|e| AnomalyError::io(path, e))
}

/// The sample as an in-memory dataset keyed on `timestamp`.
pub fn sample_dataset() -> Result<Dataset> {
    let (headers, records) = crate::table::read_records(SAMPLE_CSV.as_bytes())
        .map_err(|e| AnomalyError::MalformedTable(e.to_string()))?;
    Dataset::from_records(headers, records, "timestamp")
}
