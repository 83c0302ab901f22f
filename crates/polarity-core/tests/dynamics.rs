//! Simulation dynamics tests
//!
//! Whole-run properties of the force model and the institutional metrics.

use polarity_core::components::agent::{Agent, AgentId, IDEOLOGY_LIMIT};
use polarity_core::config::PopulationConfig;
use polarity_core::setup::create_parties;
use polarity_core::{EventKind, SimConfig, SimParams, Simulation};

fn small_config(params: SimParams) -> SimConfig {
    SimConfig {
        params,
        population: PopulationConfig {
            size: 120,
            friends_per_agent: 5,
            seed_data: None,
        },
    }
}

fn still_params() -> SimParams {
    SimParams {
        affective_polarization: 0.0,
        party_opportunism: 0.0,
        noise: 0.0,
        media_frequency: 0.0,
        radicalization_scale: 1.0,
        simulation_speed: 1,
    }
}

#[test]
fn test_positions_stay_in_bounds_under_extreme_params() {
    let params = SimParams {
        affective_polarization: 1.0,
        party_opportunism: 1.0,
        noise: 5.0,
        media_frequency: 1.0,
        radicalization_scale: 10.0,
        simulation_speed: 1,
    };
    let mut sim = Simulation::new(small_config(params), 3);

    for _ in 0..50 {
        sim.step();
        for agent in sim.agents() {
            assert!(agent.x.abs() <= IDEOLOGY_LIMIT, "x out of bounds: {}", agent.x);
            assert!((0.0..=1.0).contains(&agent.y), "y out of bounds: {}", agent.y);
        }
    }
}

#[test]
fn test_institution_invariants_hold() {
    let params = SimParams {
        noise: 0.05,
        ..SimParams::default()
    };
    let mut sim = Simulation::new(small_config(params), 11);
    sim.trigger_mass_radicalization();

    let mut last_output = sim.institutions().legislative_output;
    for _ in 0..200 {
        sim.step();
        let institutions = sim.institutions();
        assert!((0.0..=100.0).contains(&institutions.judiciary_capacity));
        assert!(institutions.legislative_output >= last_output);
        assert!(institutions.polarization >= 0.0);
        last_output = institutions.legislative_output;
    }
}

#[test]
fn test_metrics_recorded_every_tenth_step() {
    let mut sim = Simulation::new(small_config(SimParams::default()), 5);
    sim.run_steps(25);

    let steps: Vec<u64> = sim.metrics_log().iter().map(|r| r.step).collect();
    assert_eq!(steps, vec![10, 20]);
}

#[test]
fn test_strengths_count_every_agent() {
    let mut sim = Simulation::new(small_config(SimParams::default()), 8);
    sim.step();

    let total: u32 = sim.parties().all_parties().map(|p| p.strength).sum();
    assert_eq!(total as usize, sim.agents().len());
    assert!(sim.agents().iter().all(|a| a.party.is_some()));
}

#[test]
fn test_lone_centrist_drifts_to_center() {
    let agent = Agent::new(AgentId(0), 0.05, 0.5).with_traits(0.5, 0.0);
    let mut sim = Simulation::from_parts(small_config(still_params()), 1, vec![agent], create_parties());

    sim.step();

    let agent = &sim.agents()[0];
    assert!(agent.x < 0.05, "agent should move toward the Centrist Bloc, got {}", agent.x);
    let centrist = sim.parties().find_by_name("Centrist Bloc").unwrap();
    assert_eq!(agent.party, Some(centrist.id));
    assert_eq!(centrist.strength, 1);
}

#[test]
fn test_mass_radicalization_pushes_outward() {
    let agents = vec![
        Agent::new(AgentId(0), 0.4, 0.5),
        Agent::new(AgentId(1), -0.2, 0.5),
        Agent::new(AgentId(2), 1.0, 0.5),
    ];
    let mut sim = Simulation::from_parts(small_config(still_params()), 1, agents, create_parties());

    sim.trigger_mass_radicalization();

    let xs: Vec<f64> = sim.agents().iter().map(|a| a.x).collect();
    assert!((xs[0] - 0.7).abs() < 1e-12);
    assert!((xs[1] + 0.5).abs() < 1e-12);
    assert_eq!(xs[2], IDEOLOGY_LIMIT);
    assert_eq!(sim.events().last().unwrap().kind, EventKind::MassRadicalization);
}

#[test]
fn test_coalition_moves_follower() {
    let mut sim = Simulation::new(small_config(still_params()), 2);
    sim.form_coalition(0, 1).unwrap();

    let follower = sim.parties().find_by_name("Radical Left").unwrap();
    assert!((follower.current_ideology + 0.4).abs() < 1e-12);
}

#[test]
fn test_export_after_reset_is_header_only() {
    let mut sim = Simulation::new(small_config(SimParams::default()), 4);
    sim.run_steps(30);
    let csv = sim.export_metrics();
    assert_eq!(csv.lines().count(), 4);

    sim.reset();
    let csv = sim.export_metrics();
    assert_eq!(csv, "Time,Polarization,Judiciary,Legislative,Gini\n");
}
