//! Party Strategy System
//!
//! Parties drift back toward their base ideology and occasionally jump toward
//! a random position to chase voters.

use bevy_ecs::prelude::*;
use polarity_events::EventKind;
use rand::Rng;

use crate::components::party::{Party, PartyRegistry};
use crate::components::world::Clock;
use crate::config::SimParams;
use crate::events::EventLog;
use crate::SimRng;

/// Per-step jump probability at full opportunism
pub const OPPORTUNISM_RATE: f64 = 0.01;

/// Jump targets are drawn from [-OPPORTUNISTIC_TARGET_SPAN, OPPORTUNISTIC_TARGET_SPAN]
pub const OPPORTUNISTIC_TARGET_SPAN: f64 = 0.75;

/// Fraction of the gap to the target covered by a jump
pub const OPPORTUNISTIC_JUMP: f64 = 0.1;

/// Fraction of the gap to the base ideology recovered every step
pub const REVERSION_RATE: f64 = 0.01;

/// Applies one step of strategy to a party. Returns true when it made an
/// opportunistic jump.
///
/// The jump and the mean reversion both apply in the same step.
pub fn drift_party(party: &mut Party, opportunism: f64, rng: &mut impl Rng) -> bool {
    let jumped = rng.gen::<f64>() < OPPORTUNISM_RATE * opportunism;
    if jumped {
        let target = (rng.gen::<f64>() - 0.5) * 2.0 * OPPORTUNISTIC_TARGET_SPAN;
        party.current_ideology += (target - party.current_ideology) * OPPORTUNISTIC_JUMP;
    }

    party.current_ideology += (party.base_ideology - party.current_ideology) * REVERSION_RATE;
    jumped
}

/// System to update every party's ideology, logging opportunistic shifts
pub fn update_party_strategies(
    params: Res<SimParams>,
    clock: Res<Clock>,
    mut parties: ResMut<PartyRegistry>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<EventLog>,
) {
    for party in parties.all_parties_mut() {
        if drift_party(party, params.party_opportunism, &mut rng.0) {
            log.record(
                clock.step,
                EventKind::OpportunisticShift,
                format!("Crisis: {} shifts ideology opportunistically!", party.name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::party::PartyId;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_reverts_toward_base_without_opportunism() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut party = Party::new(PartyId(0), "Centrist Bloc", 0.0, "#94a3b8", 0.5);
        party.current_ideology = 0.5;

        for _ in 0..10 {
            assert!(!drift_party(&mut party, 0.0, &mut rng));
        }
        let expected = 0.5 * 0.99f64.powi(10);
        assert!((party.current_ideology - expected).abs() < 1e-12);
    }

    #[test]
    fn test_party_at_base_stays_put() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut party = Party::new(PartyId(0), "Religious Right", 0.8, "#a855f7", 0.8);
        for _ in 0..100 {
            drift_party(&mut party, 0.0, &mut rng);
        }
        assert_eq!(party.current_ideology, 0.8);
    }

    #[test]
    fn test_jumps_stay_within_target_span() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut party = Party::new(PartyId(0), "Radical Left", -0.8, "#ef4444", 0.2);
        let mut jumps = 0;
        for _ in 0..20_000 {
            if drift_party(&mut party, 100.0, &mut rng) {
                jumps += 1;
            }
            assert!(party.current_ideology >= -0.8 - 1e-9);
            assert!(party.current_ideology <= OPPORTUNISTIC_TARGET_SPAN);
        }
        // opportunism 100 makes every step a jump
        assert_eq!(jumps, 20_000);
    }

    #[test]
    fn test_system_logs_shifts() {
        let mut world = World::new();
        let mut registry = PartyRegistry::new();
        registry.register(Party::new(PartyId(0), "Centrist Bloc", 0.0, "#94a3b8", 0.5));
        world.insert_resource(registry);
        world.insert_resource(SimParams {
            party_opportunism: 100.0,
            ..SimParams::default()
        });
        world.insert_resource(Clock::new());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(4)));
        world.insert_resource(EventLog::new());

        let mut schedule = Schedule::default();
        schedule.add_systems(update_party_strategies);
        schedule.run(&mut world);

        let log = world.resource::<EventLog>();
        assert_eq!(log.count_of(EventKind::OpportunisticShift), 1);
        assert!(log.entries()[0].message.contains("Centrist Bloc"));
    }
}
