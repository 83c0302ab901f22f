//! Simulation Clock
//!
//! Owns the ECS world and the per-step schedule. External drivers call
//! `step`, `run_steps` or `run_frame`, issue commands between steps, and read
//! state through borrowed views or owned snapshots.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use polarity_events::{ClockStatus, EventKind, MetricsRecord, SimEvent, WorldSnapshot};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;

use crate::components::agent::{Agent, Population};
use crate::components::party::PartyRegistry;
use crate::components::world::{Clock, Institutions, MetricsLog};
use crate::config::{SimConfig, SimParams};
use crate::events::EventLog;
use crate::interventions::{
    form_coalition, radicalize_population, Intervention, InterventionError, ScriptCursor,
};
use crate::output::{generate_snapshot, metrics_to_csv};
use crate::setup::{build_population, create_parties};
use crate::systems::{
    apply_forces, compute_metrics, rebuild_spatial_index, record_metrics,
    sample_institution_warnings, sample_media_shock, update_party_strategies, MediaShock,
    SpatialIndex,
};
use crate::SimRng;

/// Build the schedule for one step
pub fn build_step_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            update_party_strategies,
            rebuild_spatial_index,
            sample_media_shock,
            apply_forces,
            compute_metrics,
            record_metrics,
            sample_institution_warnings,
        )
            .chain(),
    );
    schedule
}

/// A complete simulation run
pub struct Simulation {
    world: World,
    schedule: Schedule,
    config: SimConfig,
    snapshot_sequence: u64,
}

impl Simulation {
    /// Create a simulation from configuration, seeding every random draw.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let population = build_population(&config.population, &mut rng);
        Self::assemble(config, rng, population, create_parties())
    }

    /// Create a simulation around hand-built agents and parties.
    ///
    /// Agent ids must match their position in `agents`. A later `reset`
    /// regenerates the population from `config`.
    pub fn from_parts(config: SimConfig, seed: u64, agents: Vec<Agent>, parties: PartyRegistry) -> Self {
        let rng = SmallRng::seed_from_u64(seed);
        Self::assemble(config, rng, Population::new(agents), parties)
    }

    fn assemble(config: SimConfig, rng: SmallRng, population: Population, parties: PartyRegistry) -> Self {
        let mut world = World::new();
        world.insert_resource(config.params.clone());
        world.insert_resource(SimRng(rng));
        world.insert_resource(EventLog::new());
        insert_run_state(&mut world, population, parties);

        tracing::info!(
            agents = world.resource::<Population>().len(),
            parties = world.resource::<PartyRegistry>().len(),
            "Simulation initialized"
        );

        Self {
            world,
            schedule: build_step_schedule(),
            config,
            snapshot_sequence: 0,
        }
    }

    /// Mirror the event log to a JSONL file.
    ///
    /// Entries recorded before the call are written to the file first.
    pub fn with_event_sink(mut self, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut log = EventLog::with_sink(path)?;
        for event in self.events() {
            log.record(event.step, event.kind, event.message.clone());
        }
        self.world.insert_resource(log);
        Ok(self)
    }

    /// Advance one step. Returns false (and does nothing) while paused.
    pub fn step(&mut self) -> bool {
        if self.world.resource::<Clock>().is_paused() {
            return false;
        }
        self.world.resource_mut::<Clock>().advance();
        self.schedule.run(&mut self.world);
        true
    }

    /// Run up to `n` steps, returning how many actually executed.
    pub fn run_steps(&mut self, n: u32) -> u32 {
        let mut executed = 0;
        for _ in 0..n {
            if !self.step() {
                break;
            }
            executed += 1;
        }
        executed
    }

    /// Run one external frame: `simulation_speed` steps.
    pub fn run_frame(&mut self) -> u32 {
        let speed = self.params().simulation_speed;
        self.run_steps(speed)
    }

    /// Apply every scripted intervention that has come due.
    ///
    /// Failed interventions are logged and skipped.
    pub fn apply_due(&mut self, cursor: &mut ScriptCursor<'_>) {
        for scheduled in cursor.take_due() {
            if let Some(reason) = &scheduled.reason {
                tracing::info!(step = scheduled.step, "Intervention: {}", reason);
            }
            if let Err(e) = self.apply_intervention(&scheduled.intervention) {
                tracing::warn!(step = scheduled.step, "Intervention failed: {}", e);
            }
        }
    }

    /// Run one frame, then apply what the script has due.
    ///
    /// The cursor advances by the frame's `simulation_speed` even when paused,
    /// so a scheduled resume still fires.
    pub fn run_scripted_frame(&mut self, cursor: &mut ScriptCursor<'_>) -> u32 {
        let speed = self.params().simulation_speed;
        let executed = self.run_frame();
        cursor.advance(u64::from(speed));
        self.apply_due(cursor);
        executed
    }

    pub fn pause(&mut self) {
        if !self.is_paused() {
            self.toggle_pause();
        }
    }

    pub fn resume(&mut self) {
        if self.is_paused() {
            self.toggle_pause();
        }
    }

    /// Flip between running and paused, logging the transition.
    pub fn toggle_pause(&mut self) -> ClockStatus {
        let status = self.world.resource_mut::<Clock>().toggle();
        let (kind, message) = match status {
            ClockStatus::Paused => (EventKind::Paused, "Simulation paused."),
            ClockStatus::Running => (EventKind::Resumed, "Simulation resumed."),
        };
        self.record_event(kind, message);
        status
    }

    pub fn is_paused(&self) -> bool {
        self.world.resource::<Clock>().is_paused()
    }

    pub fn status(&self) -> ClockStatus {
        self.world.resource::<Clock>().status
    }

    /// Reinitialize agents, parties, counters and the metrics log.
    ///
    /// Parameters, the random stream and the event log carry over.
    pub fn reset(&mut self) {
        let population = {
            let mut rng = self.world.resource_mut::<SimRng>();
            build_population(&self.config.population, &mut rng.0)
        };
        insert_run_state(&mut self.world, population, create_parties());
        self.record_event(EventKind::Reset, "System reset.");
        tracing::info!(agents = self.agents().len(), "Simulation reset");
    }

    /// Push every agent 0.3 further from the center.
    pub fn trigger_mass_radicalization(&mut self) {
        radicalize_population(&mut self.world.resource_mut::<Population>());
        self.record_event(EventKind::MassRadicalization, "Event: Mass radicalization triggered.");
    }

    /// Pin `follower`'s ideology just left of `leader`'s.
    pub fn form_coalition(&mut self, follower: usize, leader: usize) -> Result<(), InterventionError> {
        let (follower_name, leader_name) =
            form_coalition(&mut self.world.resource_mut::<PartyRegistry>(), follower, leader)?;
        self.record_event(
            EventKind::Coalition,
            format!(
                "Event: Strategic coalition formed ({} aligns with {}).",
                follower_name, leader_name
            ),
        );
        Ok(())
    }

    /// Serialize the metrics log as CSV text.
    pub fn export_metrics(&mut self) -> String {
        let csv = metrics_to_csv(self.metrics_log());
        self.record_event(EventKind::MetricsExported, "Data exported.");
        csv
    }

    /// Apply one external command.
    pub fn apply_intervention(&mut self, intervention: &Intervention) -> Result<(), InterventionError> {
        match intervention {
            Intervention::Pause => self.pause(),
            Intervention::Resume => self.resume(),
            Intervention::TogglePause => {
                self.toggle_pause();
            }
            Intervention::Reset => self.reset(),
            Intervention::TriggerMassRadicalization => self.trigger_mass_radicalization(),
            Intervention::FormCoalition { follower, leader } => {
                self.form_coalition(*follower, *leader)?
            }
            Intervention::SetParam { param, value } => self.params_mut().set(*param, *value),
        }
        Ok(())
    }

    fn record_event(&mut self, kind: EventKind, message: impl Into<String>) {
        let step = self.step_count();
        self.world.resource_mut::<EventLog>().record(step, kind, message);
    }

    pub fn step_count(&self) -> u64 {
        self.world.resource::<Clock>().step
    }

    pub fn params(&self) -> &SimParams {
        self.world.resource::<SimParams>()
    }

    /// Runtime parameters; changes take effect on the next step.
    pub fn params_mut(&mut self) -> &mut SimParams {
        self.world.resource_mut::<SimParams>().into_inner()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        self.world.resource::<Population>().agents()
    }

    pub fn parties(&self) -> &PartyRegistry {
        self.world.resource::<PartyRegistry>()
    }

    pub fn institutions(&self) -> &Institutions {
        self.world.resource::<Institutions>()
    }

    pub fn metrics_log(&self) -> &[MetricsRecord] {
        self.world.resource::<MetricsLog>().records()
    }

    pub fn events(&self) -> &[SimEvent] {
        self.world.resource::<EventLog>().entries()
    }

    /// Flush the event sink, if any.
    pub fn flush_events(&mut self) -> std::io::Result<()> {
        self.world.resource_mut::<EventLog>().flush()
    }

    /// Owned copy of the observable state, safe to hand to other threads.
    pub fn snapshot(&mut self, include_log: bool) -> WorldSnapshot {
        self.snapshot_sequence += 1;
        generate_snapshot(&self.world, self.snapshot_sequence, include_log)
    }
}

/// Insert (or replace) every resource that a reset reinitializes.
fn insert_run_state(world: &mut World, population: Population, parties: PartyRegistry) {
    world.insert_resource(Clock::new());
    world.insert_resource(Institutions::new());
    world.insert_resource(MetricsLog::new());
    world.insert_resource(SpatialIndex::new());
    world.insert_resource(MediaShock::default());
    world.insert_resource(population);
    world.insert_resource(parties);
}
