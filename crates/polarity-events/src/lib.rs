//! Shared event and snapshot types for the polarization simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Display, export and analysis tooling depend on it without pulling in the engine.

pub mod event;
pub mod metrics;
pub mod snapshot;

// Re-export event types
pub use event::{generate_event_id, EventKind, SimEvent};

// Re-export metrics types
pub use metrics::{MetricsRecord, METRICS_CSV_HEADER};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentSnapshot, ClockStatus, InstitutionSnapshot, PartySnapshot,
    WorldSnapshot,
};
