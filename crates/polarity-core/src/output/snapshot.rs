//! Snapshot Generation
//!
//! Copies the observable state out of the ECS world between steps.

use bevy_ecs::prelude::*;
use polarity_events::{generate_snapshot_id, AgentSnapshot, PartySnapshot, WorldSnapshot};
use std::fs;
use std::path::Path;

use crate::components::agent::Population;
use crate::components::party::PartyRegistry;
use crate::components::world::{Clock, Institutions, MetricsLog};

/// Build a snapshot of the current world state.
///
/// `sequence` numbers the snapshot; `include_log` embeds the metrics log.
pub fn generate_snapshot(world: &World, sequence: u64, include_log: bool) -> WorldSnapshot {
    let clock = world.resource::<Clock>();
    let institutions = world.resource::<Institutions>();
    let population = world.resource::<Population>();
    let parties = world.resource::<PartyRegistry>();

    let agents = population
        .agents()
        .iter()
        .map(|agent| AgentSnapshot {
            agent_id: agent.id.0,
            x: agent.x,
            y: agent.y,
            party: agent.party.map(|p| p.0),
        })
        .collect();

    let parties = parties
        .all_parties()
        .map(|party| PartySnapshot {
            party_id: party.id.0,
            name: party.name.clone(),
            color: party.color.clone(),
            base_ideology: party.base_ideology,
            current_ideology: party.current_ideology,
            y_pos: party.y_pos,
            influence_radius: party.influence_radius,
            strength: party.strength,
        })
        .collect();

    let metrics_log = if include_log {
        world.resource::<MetricsLog>().records().to_vec()
    } else {
        Vec::new()
    };

    WorldSnapshot {
        snapshot_id: generate_snapshot_id(sequence),
        step: clock.step,
        status: clock.status,
        institutions: institutions.snapshot(),
        parties,
        agents,
        metrics_log,
    }
}

/// Write a snapshot as pretty JSON, creating parent directories as needed
pub fn write_snapshot(path: impl AsRef<Path>, snapshot: &WorldSnapshot) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}
