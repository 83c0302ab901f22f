//! Population Setup
//!
//! Spawns agents from survey-style seed data when available, otherwise from a
//! synthetic near-normal ideology distribution, then wires random friendships.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::agent::{Agent, AgentId, Population};
use crate::config::PopulationConfig;

/// One seed-data row; missing fields are drawn at random
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedRecord {
    #[serde(default)]
    pub ideology: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Why seed data could not be used
#[derive(Debug, Error)]
pub enum SeedDataError {
    #[error("could not read seed data: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse seed data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed data contains no records")]
    Empty,
}

/// Load `{ideology, y}` records from a JSON array file.
pub fn load_seed_data(path: impl AsRef<Path>) -> Result<Vec<SeedRecord>, SeedDataError> {
    let content = fs::read_to_string(path)?;
    parse_seed_data(&content)
}

pub fn parse_seed_data(content: &str) -> Result<Vec<SeedRecord>, SeedDataError> {
    let records: Vec<SeedRecord> = serde_json::from_str(content)?;
    if records.is_empty() {
        return Err(SeedDataError::Empty);
    }
    Ok(records)
}

/// Sum of six uniforms, re-centered and scaled to roughly [-1, 1].
pub fn synthetic_ideology(rng: &mut impl Rng) -> f64 {
    let sum: f64 = (0..6).map(|_| rng.gen::<f64>()).sum();
    (sum - 3.0) / 3.0
}

/// Spawn agents from seed records, keeping at most `size` of them.
pub fn spawn_from_records(records: &[SeedRecord], size: usize, rng: &mut impl Rng) -> Vec<Agent> {
    records
        .iter()
        .take(size)
        .enumerate()
        .map(|(i, record)| {
            let x = record.ideology.unwrap_or_else(|| rng.gen::<f64>() * 2.0 - 1.0);
            let y = record.y.unwrap_or_else(|| rng.gen::<f64>());
            Agent::spawn(AgentId(i), x, y, rng)
        })
        .collect()
}

/// Spawn `size` agents with synthetic ideology and uniform social position.
pub fn spawn_synthetic(size: usize, rng: &mut impl Rng) -> Vec<Agent> {
    (0..size)
        .map(|i| {
            let x = synthetic_ideology(rng);
            let y = rng.gen::<f64>();
            Agent::spawn(AgentId(i), x, y, rng)
        })
        .collect()
}

/// Gives each agent up to `per_agent` random friends, skipping itself and
/// repeats. Links are one-directional.
pub fn wire_friendships(agents: &mut [Agent], per_agent: usize, rng: &mut impl Rng) {
    let n = agents.len();
    if n == 0 {
        return;
    }

    for agent in agents.iter_mut() {
        for _ in 0..per_agent {
            let friend = AgentId(rng.gen_range(0..n));
            if friend != agent.id && !agent.is_friend(friend) {
                agent.friends.push(friend);
            }
        }
    }
}

/// Builds the full population described by `config`.
///
/// Seed-data failures are never fatal: they are logged and replaced by
/// synthetic generation.
pub fn build_population(config: &PopulationConfig, rng: &mut impl Rng) -> Population {
    let seeded = config.seed_data.as_ref().and_then(|path| match load_seed_data(path) {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!("Seed data {} unusable ({}); using synthetic agents", path.display(), e);
            None
        }
    });

    let mut agents = match seeded {
        Some(records) => {
            tracing::info!("Spawning agents from {} seed records", records.len().min(config.size));
            spawn_from_records(&records, config.size, rng)
        }
        None => spawn_synthetic(config.size, rng),
    };

    wire_friendships(&mut agents, config.friends_per_agent, rng);
    Population::new(agents)
}
