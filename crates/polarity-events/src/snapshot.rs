//! Snapshot Types
//!
//! Owned copies of the observable simulation state.
//!
//! Snapshots are taken between steps and handed to rendering, UI and export
//! collaborators, which never touch the live state directly.

use serde::{Deserialize, Serialize};

use crate::MetricsRecord;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Whether the clock advances on `step()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockStatus {
    #[default]
    Running,
    Paused,
}

/// Agent position and current affiliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: usize,
    pub x: f64,
    pub y: f64,
    /// Index into `WorldSnapshot::parties`
    #[serde(default)]
    pub party: Option<usize>,
}

/// Party state as drawn by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub party_id: usize,
    pub name: String,
    pub color: String,
    pub base_ideology: f64,
    pub current_ideology: f64,
    pub y_pos: f64,
    pub influence_radius: f64,
    /// Adherent count from the most recent step
    #[serde(default)]
    pub strength: u32,
}

/// Current scalar metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstitutionSnapshot {
    pub polarization: f64,
    pub judiciary_capacity: f64,
    pub legislative_output: f64,
    pub gini: f64,
}

/// Complete observable state between two steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub snapshot_id: String,
    pub step: u64,
    #[serde(default)]
    pub status: ClockStatus,
    pub institutions: InstitutionSnapshot,
    pub parties: Vec<PartySnapshot>,
    pub agents: Vec<AgentSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics_log: Vec<MetricsRecord>,
}

impl WorldSnapshot {
    /// Agents currently affiliated with the given party.
    pub fn adherents_of(&self, party_id: usize) -> impl Iterator<Item = &AgentSnapshot> {
        self.agents
            .iter()
            .filter(move |agent| agent.party == Some(party_id))
    }

    pub fn party_by_name(&self, name: &str) -> Option<&PartySnapshot> {
        self.parties.iter().find(|party| party.name == name)
    }
}
