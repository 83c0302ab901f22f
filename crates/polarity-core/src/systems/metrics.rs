//! Metrics Engine
//!
//! Derives polarization and party-system inequality from the population,
//! feeds institutional health, and appends periodic records to the log.

use bevy_ecs::prelude::*;
use polarity_events::{EventKind, MetricsRecord};
use rand::Rng;

use crate::components::agent::Population;
use crate::components::party::PartyRegistry;
use crate::components::world::{Clock, Institutions, MetricsLog};
use crate::events::EventLog;
use crate::SimRng;

/// A metrics record is appended every this many steps
pub const METRICS_LOG_INTERVAL: u64 = 10;

/// Below this judiciary capacity warnings may be raised
pub const CRITICAL_JUDICIARY_CAPACITY: f64 = 20.0;

/// Chance per qualifying step that a warning is actually raised
pub const WARNING_PROBABILITY: f64 = 0.05;

/// Twice the population standard deviation of `ideologies`; 0 when empty.
pub fn polarization(ideologies: &[f64]) -> f64 {
    if ideologies.is_empty() {
        return 0.0;
    }
    let n = ideologies.len() as f64;
    let mean = ideologies.iter().sum::<f64>() / n;
    let variance = ideologies.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() * 2.0
}

/// Gini coefficient of `values`.
///
/// When `n² · mean` is zero or undefined the denominator falls back to 1, so
/// an all-zero (or empty) input yields 0.
pub fn gini(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i as f64 + 1.0) - n - 1.0) * v)
        .sum();
    let mean = sorted.iter().sum::<f64>() / n;

    let denominator = n * n * mean;
    let denominator = if denominator == 0.0 || denominator.is_nan() {
        1.0
    } else {
        denominator
    };
    weighted.abs() / denominator
}

/// System to compute polarization, institutional health and Gini for this step
pub fn compute_metrics(
    population: Res<Population>,
    parties: Res<PartyRegistry>,
    mut institutions: ResMut<Institutions>,
) {
    institutions.apply_polarization(polarization(&population.ideologies()));

    let strengths: Vec<f64> = parties.all_parties().map(|p| p.strength as f64).collect();
    institutions.gini = gini(&strengths);
}

/// System to append a metrics record on every tenth step
pub fn record_metrics(
    clock: Res<Clock>,
    institutions: Res<Institutions>,
    mut metrics_log: ResMut<MetricsLog>,
) {
    if clock.step % METRICS_LOG_INTERVAL != 0 {
        return;
    }

    metrics_log.push(MetricsRecord {
        step: clock.step,
        polarization: institutions.polarization,
        judiciary_capacity: institutions.judiciary_capacity,
        legislative_output: institutions.legislative_output,
        gini: institutions.gini,
    });
}

/// System to occasionally warn while the judiciary is critically weak
pub fn sample_institution_warnings(
    clock: Res<Clock>,
    institutions: Res<Institutions>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<EventLog>,
) {
    if institutions.judiciary_capacity < CRITICAL_JUDICIARY_CAPACITY
        && rng.0.gen::<f64>() < WARNING_PROBABILITY
    {
        log.record(
            clock.step,
            EventKind::JudicialWarning,
            "Warning: Judicial capacity critical! Rule of law eroding.",
        );
    }
}
