//! Party Components
//!
//! Parties act as moving attractors on the ideology axis.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Radius of the influence halo drawn around a party
pub const DEFAULT_INFLUENCE_RADIUS: f64 = 0.25;

/// Index of a party inside the registry's ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub usize);

/// A single party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    /// Display name
    pub name: String,
    /// Hex color used by renderers
    pub color: String,
    /// Anchor the ideology reverts toward
    pub base_ideology: f64,
    /// Position this step
    pub current_ideology: f64,
    /// Vertical anchor in social-cluster space
    pub y_pos: f64,
    pub influence_radius: f64,
    /// Number of adherents as of the last step
    pub strength: u32,
}

impl Party {
    pub fn new(
        id: PartyId,
        name: impl Into<String>,
        ideology: f64,
        color: impl Into<String>,
        y_pos: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            base_ideology: ideology,
            current_ideology: ideology,
            y_pos,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
            strength: 0,
        }
    }

    /// Distance between this party and a point on the ideology axis.
    pub fn distance_to(&self, x: f64) -> f64 {
        (x - self.current_ideology).abs()
    }
}

/// Resource: ordered list of parties
#[derive(Resource, Debug, Clone, Default)]
pub struct PartyRegistry {
    parties: Vec<Party>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a party at the end of the list, assigning its id from its position.
    pub fn register(&mut self, mut party: Party) -> PartyId {
        let id = PartyId(self.parties.len());
        party.id = id;
        self.parties.push(party);
        id
    }

    pub fn get(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(id.0)
    }

    pub fn get_mut(&mut self, id: PartyId) -> Option<&mut Party> {
        self.parties.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Party> {
        self.parties.iter().find(|party| party.name == name)
    }

    pub fn all_parties(&self) -> impl Iterator<Item = &Party> {
        self.parties.iter()
    }

    pub fn all_parties_mut(&mut self) -> impl Iterator<Item = &mut Party> {
        self.parties.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Party closest to `x`; the earliest registered party wins ties.
    pub fn nearest(&self, x: f64) -> Option<PartyId> {
        let mut best = None;
        let mut min_dist = f64::INFINITY;
        for party in &self.parties {
            let d = party.distance_to(x);
            if d < min_dist {
                min_dist = d;
                best = Some(party.id);
            }
        }
        best
    }

    /// Stores adherent counts, one per party in registry order.
    pub fn set_strengths(&mut self, strengths: &[u32]) {
        for (party, &count) in self.parties.iter_mut().zip(strengths) {
            party.strength = count;
        }
    }
}
