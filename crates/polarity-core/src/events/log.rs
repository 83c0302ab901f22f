//! Event Log
//!
//! In-memory, append-only record of notable occurrences, with an optional
//! JSONL sink for external display tooling.

use bevy_ecs::prelude::*;
use polarity_events::{generate_event_id, EventKind, SimEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Resource: every event recorded since the log was created
#[derive(Resource)]
pub struct EventLog {
    entries: Vec<SimEvent>,
    writer: Option<BufWriter<File>>,
    next_event_id: u64,
}

impl EventLog {
    /// Create an in-memory log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            writer: None,
            next_event_id: 1,
        }
    }

    /// Create a log that also mirrors each entry to a JSONL file
    pub fn with_sink(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut log = Self::new();
        log.writer = Some(BufWriter::new(file));
        Ok(log)
    }

    /// Append an event tagged with `step`.
    pub fn record(&mut self, step: u64, kind: EventKind, message: impl Into<String>) -> &SimEvent {
        let event = SimEvent::new(generate_event_id(self.next_event_id), step, kind, message);
        self.next_event_id += 1;

        tracing::debug!(step, kind = ?kind, "{}", event.message);

        if let Some(ref mut writer) = self.writer {
            let written = serde_json::to_string(&event)
                .map_err(std::io::Error::from)
                .and_then(|json| writeln!(writer, "{}", json));
            if let Err(e) = written {
                tracing::warn!("Failed to write event {}: {}", event.event_id, e);
            }
        }

        self.entries.push(event);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[SimEvent] {
        &self.entries
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|event| event.kind == kind).count()
    }

    pub fn latest(&self) -> Option<&SimEvent> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flush the sink to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: Failed to flush event log: {}", e);
        }
    }
}
