//! Metrics Export
//!
//! Serializes the metrics log to a CSV table.

use polarity_events::{MetricsRecord, METRICS_CSV_HEADER};
use std::fs;
use std::path::Path;

/// Renders records as CSV: a header row, then one row per record, each line
/// newline-terminated.
pub fn metrics_to_csv(records: &[MetricsRecord]) -> String {
    let mut csv = String::with_capacity(32 * (records.len() + 1));
    csv.push_str(METRICS_CSV_HEADER);
    csv.push('\n');
    for record in records {
        csv.push_str(&record.to_csv_row());
        csv.push('\n');
    }
    csv
}

/// Write the CSV export, creating parent directories as needed
pub fn write_metrics_csv(path: impl AsRef<Path>, records: &[MetricsRecord]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, metrics_to_csv(records))
}
