//! Agent Components
//!
//! Individual voters: ideology position, velocity and fixed susceptibility traits.

use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::party::PartyId;

/// Soft bound of the ideology axis
pub const IDEOLOGY_LIMIT: f64 = 1.1;

/// Agents below this demographic value draw from the wider radicalization range
pub const YOUTH_DEMOGRAPHIC_THRESHOLD: f64 = 0.3;

/// Upper bound of radicalization for susceptible agents
pub const YOUTH_RADICALIZATION_MAX: f64 = 0.4;

/// Upper bound of radicalization for everyone else
pub const ADULT_RADICALIZATION_MAX: f64 = 0.1;

/// Initial velocity components are drawn from [-INITIAL_SPEED/2, INITIAL_SPEED/2]
pub const INITIAL_SPEED: f64 = 0.002;

/// Index of an agent inside the population arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

/// A single simulated voter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Position on the ideology axis, -1 (left) to 1 (right), soft clamped to ±1.1
    pub x: f64,
    /// Position in social-cluster space, 0 to 1
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Proxy for age/education; low values are more susceptible
    pub demographic: f64,
    /// Multiplier on party attraction and peer influence
    pub radicalization: f64,
    /// Arena indices of this agent's friends, fixed after initialization
    pub friends: Vec<AgentId>,
    /// Nearest party as of the last step
    pub party: Option<PartyId>,
}

impl Agent {
    /// Creates an agent at rest with explicit traits.
    pub fn new(id: AgentId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            demographic: 0.5,
            radicalization: 0.0,
            friends: Vec::new(),
            party: None,
        }
    }

    /// Creates an agent with a small random velocity and drawn traits.
    pub fn spawn(id: AgentId, x: f64, y: f64, rng: &mut impl Rng) -> Self {
        let vx = (rng.gen::<f64>() - 0.5) * INITIAL_SPEED;
        let vy = (rng.gen::<f64>() - 0.5) * INITIAL_SPEED;
        let demographic = rng.gen::<f64>();
        let radicalization = if demographic < YOUTH_DEMOGRAPHIC_THRESHOLD {
            rng.gen::<f64>() * YOUTH_RADICALIZATION_MAX
        } else {
            rng.gen::<f64>() * ADULT_RADICALIZATION_MAX
        };

        Self {
            id,
            x,
            y,
            vx,
            vy,
            demographic,
            radicalization,
            friends: Vec::new(),
            party: None,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_traits(mut self, demographic: f64, radicalization: f64) -> Self {
        self.demographic = demographic;
        self.radicalization = radicalization;
        self
    }

    pub fn with_friends(mut self, friends: Vec<AgentId>) -> Self {
        self.friends = friends;
        self
    }

    /// Pins the position back inside the simulated space.
    pub fn clamp_position(&mut self) {
        self.x = self.x.clamp(-IDEOLOGY_LIMIT, IDEOLOGY_LIMIT);
        self.y = self.y.clamp(0.0, 1.0);
    }

    pub fn is_friend(&self, other: AgentId) -> bool {
        self.friends.contains(&other)
    }
}

/// Resource: the agent arena
#[derive(Resource, Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Ideology positions in arena order.
    pub fn ideologies(&self) -> Vec<f64> {
        self.agents.iter().map(|agent| agent.x).collect()
    }
}
