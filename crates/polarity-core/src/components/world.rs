//! World Components
//!
//! Clock, institutional health scalars and the metrics time series.

use bevy_ecs::prelude::*;
use polarity_events::{ClockStatus, InstitutionSnapshot, MetricsRecord};

/// Judiciary capacity at the start of a run
pub const INITIAL_JUDICIARY_CAPACITY: f64 = 100.0;

/// Upper bound of judiciary capacity
pub const MAX_JUDICIARY_CAPACITY: f64 = 100.0;

/// Above this polarization the judiciary erodes
pub const JUDICIARY_STRESS_THRESHOLD: f64 = 0.8;

/// Judiciary loss per step while stressed
pub const JUDICIARY_DECAY: f64 = 0.1;

/// Judiciary gain per step otherwise
pub const JUDICIARY_RECOVERY: f64 = 0.05;

/// Below this polarization the legislature runs at full speed
pub const CONSENSUS_THRESHOLD: f64 = 0.6;

/// Above this polarization the legislature is gridlocked
pub const GRIDLOCK_THRESHOLD: f64 = 1.2;

pub const CONSENSUS_OUTPUT: f64 = 0.2;
pub const CONTESTED_OUTPUT: f64 = 0.05;

/// Resource: step counter and run state
#[derive(Resource, Debug, Clone, Default)]
pub struct Clock {
    /// Number of completed steps since the last reset
    pub step: u64,
    pub status: ClockStatus,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.status == ClockStatus::Paused
    }

    pub fn advance(&mut self) {
        self.step += 1;
    }

    /// Flips between running and paused, returning the new status.
    pub fn toggle(&mut self) -> ClockStatus {
        self.status = match self.status {
            ClockStatus::Running => ClockStatus::Paused,
            ClockStatus::Paused => ClockStatus::Running,
        };
        self.status
    }
}

/// Resource: derived institutional health
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Institutions {
    /// Twice the population standard deviation of ideology
    pub polarization: f64,
    /// 0..=100
    pub judiciary_capacity: f64,
    /// Cumulative, never decreases within a run
    pub legislative_output: f64,
    /// Inequality of party adherent counts, last step
    pub gini: f64,
}

impl Default for Institutions {
    fn default() -> Self {
        Self {
            polarization: 0.0,
            judiciary_capacity: INITIAL_JUDICIARY_CAPACITY,
            legislative_output: 0.0,
            gini: 0.0,
        }
    }
}

impl Institutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one step's polarization into the judiciary and legislature.
    pub fn apply_polarization(&mut self, polarization: f64) {
        self.polarization = polarization;

        if polarization > JUDICIARY_STRESS_THRESHOLD {
            self.judiciary_capacity -= JUDICIARY_DECAY;
        } else {
            self.judiciary_capacity += JUDICIARY_RECOVERY;
        }
        self.judiciary_capacity = self.judiciary_capacity.clamp(0.0, MAX_JUDICIARY_CAPACITY);

        self.legislative_output += legislative_gain(polarization);
    }

    pub fn snapshot(&self) -> InstitutionSnapshot {
        InstitutionSnapshot {
            polarization: self.polarization,
            judiciary_capacity: self.judiciary_capacity,
            legislative_output: self.legislative_output,
            gini: self.gini,
        }
    }
}

/// Laws passed in one step at the given polarization.
pub fn legislative_gain(polarization: f64) -> f64 {
    if polarization < CONSENSUS_THRESHOLD {
        CONSENSUS_OUTPUT
    } else if polarization > GRIDLOCK_THRESHOLD {
        0.0
    } else {
        CONTESTED_OUTPUT
    }
}

/// Resource: append-only metrics time series
#[derive(Resource, Debug, Clone, Default)]
pub struct MetricsLog {
    records: Vec<MetricsRecord>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MetricsRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MetricsRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&MetricsRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
