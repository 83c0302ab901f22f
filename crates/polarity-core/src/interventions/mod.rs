//! Intervention System
//!
//! Commands external controllers can issue between steps, either directly or
//! through a JSON script of interventions keyed by step.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::agent::{Population, IDEOLOGY_LIMIT};
use crate::components::party::{PartyId, PartyRegistry};
use crate::config::SimParams;

/// Distance every agent is pushed away from the center by mass radicalization
pub const RADICALIZATION_PUSH: f64 = 0.3;

/// Gap kept between a coalition follower and its leader
pub const COALITION_OFFSET: f64 = 0.1;

fn default_follower() -> usize {
    0
}

fn default_leader() -> usize {
    1
}

/// Runtime parameter addressed by a `set_param` intervention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    AffectivePolarization,
    PartyOpportunism,
    Noise,
    MediaFrequency,
    RadicalizationScale,
    SimulationSpeed,
}

impl SimParams {
    /// Overwrites one parameter. Values are taken as given; speed is rounded.
    pub fn set(&mut self, key: ParamKey, value: f64) {
        match key {
            ParamKey::AffectivePolarization => self.affective_polarization = value,
            ParamKey::PartyOpportunism => self.party_opportunism = value,
            ParamKey::Noise => self.noise = value,
            ParamKey::MediaFrequency => self.media_frequency = value,
            ParamKey::RadicalizationScale => self.radicalization_scale = value,
            ParamKey::SimulationSpeed => self.simulation_speed = value.max(0.0).round() as u32,
        }
    }
}

/// Types of interventions that can be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intervention {
    Pause,
    Resume,
    TogglePause,
    /// Full reinitialization
    Reset,
    /// Push every agent 0.3 further from the center
    TriggerMassRadicalization,
    /// Pin the follower's ideology just left of the leader's
    FormCoalition {
        #[serde(default = "default_follower")]
        follower: usize,
        #[serde(default = "default_leader")]
        leader: usize,
    },
    /// Change a runtime parameter
    SetParam { param: ParamKey, value: f64 },
}

impl Intervention {
    /// The coalition command bound to the default control: Radical Left
    /// follows the Center-Left Alliance.
    pub fn default_coalition() -> Self {
        Intervention::FormCoalition {
            follower: default_follower(),
            leader: default_leader(),
        }
    }
}

/// Errors raised while applying or loading interventions
#[derive(Debug, Error)]
pub enum InterventionError {
    #[error("no party with index {0}")]
    UnknownParty(usize),
    #[error("a party cannot form a coalition with itself ({0})")]
    SelfCoalition(usize),
    #[error("could not read intervention script: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse intervention script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Pushes every agent 0.3 away from the center; agents at exactly 0 go left.
///
/// Positions are clamped back to the ideology bounds.
pub fn radicalize_population(population: &mut Population) {
    for agent in population.agents_mut() {
        agent.x = if agent.x > 0.0 {
            agent.x + RADICALIZATION_PUSH
        } else {
            agent.x - RADICALIZATION_PUSH
        };
        agent.x = agent.x.clamp(-IDEOLOGY_LIMIT, IDEOLOGY_LIMIT);
    }
}

/// Sets the follower's current ideology to the leader's minus the offset.
pub fn form_coalition(
    parties: &mut PartyRegistry,
    follower: usize,
    leader: usize,
) -> Result<(String, String), InterventionError> {
    if follower == leader {
        return Err(InterventionError::SelfCoalition(follower));
    }
    let leader_party = parties
        .get(PartyId(leader))
        .ok_or(InterventionError::UnknownParty(leader))?;
    let target = leader_party.current_ideology - COALITION_OFFSET;
    let leader_name = leader_party.name.clone();

    let follower_party = parties
        .get_mut(PartyId(follower))
        .ok_or(InterventionError::UnknownParty(follower))?;
    follower_party.current_ideology = target;

    Ok((follower_party.name.clone(), leader_name))
}

/// An intervention to apply once the clock reaches `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledIntervention {
    pub step: u64,
    /// Why this intervention is being made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub intervention: Intervention,
}

/// Ordered list of scheduled interventions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterventionScript {
    entries: Vec<ScheduledIntervention>,
}

impl InterventionScript {
    pub fn new(mut entries: Vec<ScheduledIntervention>) -> Self {
        entries.sort_by_key(|entry| entry.step);
        Self { entries }
    }

    /// Load a script from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterventionError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, InterventionError> {
        let entries: Vec<ScheduledIntervention> = serde_json::from_str(content)?;
        Ok(Self::new(entries))
    }

    /// Start walking the script from elapsed step 0.
    pub fn cursor(&self) -> ScriptCursor<'_> {
        ScriptCursor {
            entries: &self.entries,
            next: 0,
            elapsed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hands out each scripted intervention exactly once, in step order.
///
/// `elapsed` counts steps the driver has scheduled, including steps skipped
/// while paused; it never goes back on reset.
#[derive(Debug, Clone)]
pub struct ScriptCursor<'a> {
    entries: &'a [ScheduledIntervention],
    next: usize,
    elapsed: u64,
}

impl<'a> ScriptCursor<'a> {
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn advance(&mut self, steps: u64) {
        self.elapsed += steps;
    }

    /// Entries scheduled at or before `elapsed` that were not handed out yet.
    pub fn take_due(&mut self) -> &'a [ScheduledIntervention] {
        let start = self.next;
        while self
            .entries
            .get(self.next)
            .is_some_and(|entry| entry.step <= self.elapsed)
        {
            self.next += 1;
        }
        &self.entries[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.entries.len()
    }
}
