//! Polarity Simulation Engine Library
//!
//! An agent-based model of political polarization: agents drift along an
//! ideology axis under party attraction, affective repulsion, peer influence,
//! media shocks and noise, while institutional health metrics follow the
//! resulting polarization signal.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod events;
pub mod interventions;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::{ConfigError, SimConfig, SimParams};
pub use interventions::{Intervention, InterventionScript, ParamKey};
pub use simulation::Simulation;
pub use polarity_events::{EventKind, MetricsRecord, SimEvent, WorldSnapshot};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
