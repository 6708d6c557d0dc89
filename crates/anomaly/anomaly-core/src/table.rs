//! CSV table I/O.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anomaly_spi::{AnomalyError, Dataset, Result};
use serde::{Deserialize, Serialize};

use crate::assembler::ScoredTable;

/// Read a header and all records from CSV text.
pub fn read_records<R: Read>(reader: R) -> std::result::Result<(Vec<String>, Vec<Vec<String>>), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.iter().map(str::to_string).collect();
    let records = csv_reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;
    Ok((headers, records))
}

/// Load a dataset from a CSV file with a header row.
pub fn load_dataset(path: impl AsRef<Path>, timestamp_column: &str) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnomalyError::io(path, e))?;
    let (headers, records) =
        read_records(BufReader::new(file)).map_err(|e| AnomalyError::io(path, e))?;
    Dataset::from_records(headers, records, timestamp_column)
}

/// Write the scored table to `path` atomically.
///
/// The table goes to a temporary file next to `path` and is renamed over it,
/// so readers never observe a partial file.
pub fn write_atomic(path: impl AsRef<Path>, table: &ScoredTable) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| AnomalyError::io(dir, e))?;
    write_table(path, BufWriter::new(tmp.as_file_mut()), table)?;
    tmp.as_file().sync_all().map_err(|e| AnomalyError::io(path, e))?;
    tmp.persist(path).map_err(|e| AnomalyError::io(path, e.error))?;
    Ok(())
}

fn write_table<W: Write>(path: &Path, writer: W, table: &ScoredTable) -> Result<()> {
    table
        .write_csv(writer)
        .map_err(|e| AnomalyError::io(path, e))
}

/// First rows of a results table, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub data: Vec<Vec<String>>,
    pub total_rows: usize,
    pub showing_rows: usize,
}

/// Read up to `limit` rows of a CSV table.
pub fn preview_table(path: impl AsRef<Path>, limit: usize) -> Result<TablePreview> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnomalyError::io(path, e))?;
    let (columns, records) =
        read_records(BufReader::new(file)).map_err(|e| AnomalyError::io(path, e))?;

    let total_rows = records.len();
    let data: Vec<Vec<String>> = records.into_iter().take(limit).collect();
    Ok(TablePreview {
        columns,
        showing_rows: data.len(),
        data,
        total_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_spi::{AnomalyResult, ErrorKind, SubScore};

    #[test]
    fn test_read_records_keeps_cell_text() {
        let text = "timestamp,cpu\n2024-01-01 00:00:00,45.20\n2024-01-01 01:00:00,\n";
        let (headers, records) = read_records(text.as_bytes()).unwrap();
        assert_eq!(headers, vec!["timestamp", "cpu"]);
        assert_eq!(records[0], vec!["2024-01-01 00:00:00", "45.20"]);
        assert_eq!(records[1], vec!["2024-01-01 01:00:00", ""]);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset("/nonexistent/input.csv", "timestamp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_load_dataset_ragged_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "timestamp,cpu\nt0,1\nt1,2,3\n").unwrap();
        let err = load_dataset(file.path(), "timestamp").unwrap_err();
        assert!(matches!(err, AnomalyError::MalformedTable(_)));
    }

    #[test]
    fn test_write_atomic_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let dataset = Dataset::from_columns("timestamp", &[("cpu", &[1.0, 2.0, 3.0])]).unwrap();
        let results = (0..3)
            .map(|i| AnomalyResult::new(i as f64, vec![SubScore::new("cpu", i as f64)]))
            .collect();
        let table = ScoredTable::assemble(&dataset, results).unwrap();

        write_atomic(&out, &table).unwrap();

        let preview = preview_table(&out, 2).unwrap();
        assert_eq!(
            preview.columns,
            vec!["timestamp", "cpu", "anomaly_score_0_100", "top_contributors"]
        );
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.showing_rows, 2);
        assert_eq!(preview.data[1], vec!["1", "2", "1.0", "cpu:1.0"]);

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_names_destination() {
        let dataset = Dataset::from_columns("timestamp", &[("cpu", &[1.0, 2.0])]).unwrap();
        let results = vec![AnomalyResult::new(0.0, vec![]); 2];
        let table = ScoredTable::assemble(&dataset, results).unwrap();

        let err = write_table(Path::new("out/results.csv"), FullDisk, &table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.is_fatal());
        let message = err.to_string();
        assert!(message.contains("results.csv"), "{}", message);
        assert!(message.contains("no space left"), "{}", message);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("absent").join("results.csv");
        let dataset = Dataset::from_columns("timestamp", &[("cpu", &[1.0])]).unwrap();
        let table =
            ScoredTable::assemble(&dataset, vec![AnomalyResult::new(0.0, vec![])]).unwrap();

        let err = write_atomic(&out, &table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
