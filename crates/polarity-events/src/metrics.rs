//! Metrics Records
//!
//! Periodic time-series entries appended by the metrics engine.

use serde::{Deserialize, Serialize};

/// Header row of the metrics CSV export
pub const METRICS_CSV_HEADER: &str = "Time,Polarization,Judiciary,Legislative,Gini";

/// One row of the metrics log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub step: u64,
    pub polarization: f64,
    pub judiciary_capacity: f64,
    pub legislative_output: f64,
    pub gini: f64,
}

impl MetricsRecord {
    /// Formats the record as a CSV row with two decimals for numeric fields.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.2},{:.2},{:.2},{:.2}",
            self.step, self.polarization, self.judiciary_capacity, self.legislative_output, self.gini
        )
    }
}
