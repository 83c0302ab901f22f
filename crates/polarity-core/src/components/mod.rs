//! Simulation Components
//!
//! Agents, parties and clock/institution state stored as ECS resources.

pub mod agent;
pub mod party;
pub mod world;

pub use agent::*;
pub use party::*;
pub use world::*;
