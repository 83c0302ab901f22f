//! Event Types
//!
//! Narrative log entries produced while the simulation runs.

use serde::{Deserialize, Serialize};

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Category of a logged occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A party jumped toward a random position
    OpportunisticShift,
    /// A global media shock nudged the population
    MediaShock,
    /// Judicial capacity dropped into the critical band
    JudicialWarning,
    /// Every agent was pushed away from the center
    MassRadicalization,
    /// One party's ideology was pinned next to another's
    Coalition,
    Paused,
    Resumed,
    Reset,
    MetricsExported,
}

impl EventKind {
    /// Critical entries are highlighted by display collaborators.
    pub fn is_critical(&self) -> bool {
        matches!(self, EventKind::JudicialWarning)
    }

    /// Returns all event kind variants.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::OpportunisticShift,
            EventKind::MediaShock,
            EventKind::JudicialWarning,
            EventKind::MassRadicalization,
            EventKind::Coalition,
            EventKind::Paused,
            EventKind::Resumed,
            EventKind::Reset,
            EventKind::MetricsExported,
        ]
    }
}

/// A single entry of the append-only event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub event_id: String,
    /// Step counter value when the event was recorded
    pub step: u64,
    pub kind: EventKind,
    pub message: String,
}

impl SimEvent {
    pub fn new(
        event_id: impl Into<String>,
        step: u64,
        kind: EventKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            step,
            kind,
            message: message.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.kind.is_critical()
    }

    /// Human-readable line, e.g. `[T+120] Media event: ideological nudge (Left)`.
    pub fn display_line(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[T+{}] {}", self.step, self.message)
    }
}
