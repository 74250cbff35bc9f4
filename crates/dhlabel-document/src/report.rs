// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Report sink — append-only `recipient;tracking;` CSV, no header row.
//
// Every record opens, appends and closes the file, so the rows written
// before a fatal error survive it.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use dhlabel_core::error::{LabelError, Result};
use dhlabel_core::types::ShipmentRecord;
use tracing::debug;

/// Field separator of the report.
pub const SEPARATOR: char = ';';

/// Appends shipment records to a CSV report.
#[derive(Debug, Clone)]
pub struct ReportSink {
    path: PathBuf,
}

impl ReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row. Repeated recipients produce repeated rows.
    pub fn append(&self, record: &ShipmentRecord) -> Result<()> {
        let line = format_row(record);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.write_failure(err))?;
        file.write_all(line.as_bytes())
            .map_err(|err| self.write_failure(err))?;

        debug!(path = %self.path.display(), "report row appended");
        Ok(())
    }

    fn write_failure(&self, err: std::io::Error) -> LabelError {
        LabelError::OutputWriteFailure {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

/// `recipient;tracking;\n`
pub fn format_row(record: &ShipmentRecord) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}\n",
        record.recipient, record.tracking_number
    )
}

/// Parse a report back into records. Lines without two fields are skipped.
pub fn read_report(path: impl AsRef<Path>) -> Result<Vec<ShipmentRecord>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .filter_map(|line| {
            let mut fields = line.split(SEPARATOR);
            match (fields.next(), fields.next()) {
                (Some(recipient), Some(tracking)) => Some(ShipmentRecord::new(recipient, tracking)),
                _ => None,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_format_has_trailing_separator() {
        let record = ShipmentRecord::new("Jane Doe", "00340434161094123456");
        assert_eq!(format_row(&record), "Jane Doe;00340434161094123456;\n");
    }

    #[test]
    fn appends_incrementally() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ReportSink::new(dir.path().join("report.csv"));

        sink.append(&ShipmentRecord::new("Jane Doe", "1")).unwrap();
        sink.append(&ShipmentRecord::new("Jane Doe", "1")).unwrap();
        sink.append(&ShipmentRecord::new("John Roe", "2")).unwrap();

        let raw = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(raw, "Jane Doe;1;\nJane Doe;1;\nJohn Roe;2;\n");
        assert_eq!(read_report(sink.path()).unwrap().len(), 3);
    }

    #[test]
    fn keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "Earlier Run;9;\n").unwrap();

        ReportSink::new(&path)
            .append(&ShipmentRecord::new("Jane Doe", "1"))
            .unwrap();

        let records = read_report(&path).unwrap();
        assert_eq!(records[0], ShipmentRecord::new("Earlier Run", "9"));
        assert_eq!(records[1], ShipmentRecord::new("Jane Doe", "1"));
    }

    #[test]
    fn unwritable_path_is_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ReportSink::new(dir.path().join("missing").join("report.csv"));
        assert!(matches!(
            sink.append(&ShipmentRecord::new("Jane Doe", "1")),
            Err(LabelError::OutputWriteFailure { .. })
        ));
    }
}
