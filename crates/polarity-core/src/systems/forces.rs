//! Force Model
//!
//! Per-agent velocity updates from five influence sources, applied in a fixed
//! order: party attraction, affective repulsion, social influence, media shock,
//! noise. All sources read ideology positions as they were when the pass
//! began, so agent order within a step does not matter.

use bevy_ecs::prelude::*;
use polarity_events::EventKind;
use rand::Rng;

use super::spatial::SpatialIndex;
use crate::components::agent::{Agent, Population};
use crate::components::party::{PartyId, PartyRegistry};
use crate::components::world::Clock;
use crate::config::SimParams;
use crate::events::EventLog;
use crate::SimRng;

/// Base pull toward the nearest party's ideology
pub const PARTY_PULL: f64 = 0.001;

/// Pull toward the nearest party's vertical anchor
pub const PARTY_ALIGNMENT: f64 = 0.001;

/// Only agents further apart than this on the ideology axis repel each other
pub const AFFECTIVE_DISTANCE: f64 = 1.0;

/// Repulsion per qualifying neighbor at full affective polarization
pub const REPULSION_STRENGTH: f64 = 0.0005;

/// Pull toward each friend's ideology
pub const FRIEND_PULL: f64 = 0.0005;

/// Media bias is drawn from [-MEDIA_BIAS_SPAN, MEDIA_BIAS_SPAN]
pub const MEDIA_BIAS_SPAN: f64 = 0.25;

/// Scales the media bias into a velocity change
pub const MEDIA_IMPACT: f64 = 0.01;

/// Velocity retained after each integration step
pub const FRICTION: f64 = 0.95;

/// Resource: the media shock drawn for the current step, if any
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaShock {
    pub bias: Option<f64>,
}

/// Read-only inputs shared by every agent in one pass
pub struct ForceField<'a> {
    pub params: &'a SimParams,
    pub parties: &'a PartyRegistry,
    pub index: &'a SpatialIndex,
    /// Ideology of every agent at the start of the pass, in arena order
    pub positions: &'a [f64],
    pub media_bias: Option<f64>,
}

impl ForceField<'_> {
    /// Nudges the agent toward its nearest party and records the affiliation.
    pub fn party_attraction(&self, agent: &mut Agent) -> Option<PartyId> {
        agent.party = self.parties.nearest(agent.x);
        let party = agent.party.and_then(|id| self.parties.get(id))?;

        let susceptibility = 1.0 + agent.radicalization * self.params.radicalization_scale;
        agent.vx += (party.current_ideology - agent.x) * PARTY_PULL * susceptibility;
        agent.vy += (party.y_pos - agent.y) * PARTY_ALIGNMENT;
        Some(party.id)
    }

    /// Pushes the agent away from nearby agents on the opposite extreme.
    pub fn affective_repulsion(&self, agent: &mut Agent) {
        let strength = self.params.affective_polarization * REPULSION_STRENGTH;
        for other in self.index.neighborhood(agent.x, agent.y) {
            if other == agent.id {
                continue;
            }
            let Some(&other_x) = self.positions.get(other.0) else {
                continue;
            };
            if (agent.x - other_x).abs() > AFFECTIVE_DISTANCE {
                let sign = if agent.x > other_x { 1.0 } else { -1.0 };
                agent.vx += sign * strength;
            }
        }
    }

    /// Pulls the agent toward its friends, weighted by its radicalization.
    pub fn social_influence(&self, agent: &mut Agent) {
        let weight = FRIEND_PULL * agent.radicalization * self.params.radicalization_scale;
        for friend in &agent.friends {
            if let Some(&friend_x) = self.positions.get(friend.0) {
                agent.vx += (friend_x - agent.x) * weight;
            }
        }
    }

    /// Applies this step's media bias, if one was drawn.
    pub fn media_push(&self, agent: &mut Agent) {
        if let Some(bias) = self.media_bias {
            agent.vx +=
                bias * agent.radicalization * MEDIA_IMPACT * self.params.radicalization_scale;
        }
    }

    /// Runs all five sources, then integrates. Returns the affiliation.
    pub fn apply(&self, agent: &mut Agent, rng: &mut impl Rng) -> Option<PartyId> {
        let party = self.party_attraction(agent);
        self.affective_repulsion(agent);
        self.social_influence(agent);
        self.media_push(agent);
        add_noise(agent, self.params.noise, rng);
        integrate(agent);
        party
    }
}

/// Uniform noise in [-noise/2, noise/2] on both velocity components.
pub fn add_noise(agent: &mut Agent, noise: f64, rng: &mut impl Rng) {
    agent.vx += (rng.gen::<f64>() - 0.5) * noise;
    agent.vy += (rng.gen::<f64>() - 0.5) * noise;
}

/// Moves the agent, applies friction and clamps it into the simulated space.
pub fn integrate(agent: &mut Agent) {
    agent.x += agent.vx;
    agent.y += agent.vy;
    agent.vx *= FRICTION;
    agent.vy *= FRICTION;
    agent.clamp_position();
}

/// System to draw this step's media shock
pub fn sample_media_shock(
    params: Res<SimParams>,
    clock: Res<Clock>,
    mut media: ResMut<MediaShock>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<EventLog>,
) {
    media.bias = None;
    if rng.0.gen::<f64>() >= params.media_frequency {
        return;
    }

    let bias = (rng.0.gen::<f64>() - 0.5) * 2.0 * MEDIA_BIAS_SPAN;
    media.bias = Some(bias);
    let direction = if bias > 0.0 { "Right" } else { "Left" };
    log.record(
        clock.step,
        EventKind::MediaShock,
        format!("Media event: ideological nudge ({})", direction),
    );
}

/// System to accumulate forces and integrate every agent
pub fn apply_forces(
    params: Res<SimParams>,
    index: Res<SpatialIndex>,
    media: Res<MediaShock>,
    mut parties: ResMut<PartyRegistry>,
    mut population: ResMut<Population>,
    mut rng: ResMut<SimRng>,
) {
    let positions = population.ideologies();
    let mut strengths = vec![0u32; parties.len()];

    {
        let field = ForceField {
            params: &params,
            parties: &parties,
            index: &index,
            positions: &positions,
            media_bias: media.bias,
        };

        for agent in population.agents_mut() {
            if let Some(id) = field.apply(agent, &mut rng.0) {
                strengths[id.0] += 1;
            }
        }
    }

    parties.set_strengths(&strengths);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::AgentId;
    use crate::components::party::Party;
    use crate::setup::create_parties;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quiet_params() -> SimParams {
        SimParams {
            affective_polarization: 0.0,
            party_opportunism: 0.0,
            noise: 0.0,
            media_frequency: 0.0,
            radicalization_scale: 1.0,
            simulation_speed: 1,
        }
    }

    fn field<'a>(
        params: &'a SimParams,
        parties: &'a PartyRegistry,
        index: &'a SpatialIndex,
        positions: &'a [f64],
    ) -> ForceField<'a> {
        ForceField {
            params,
            parties,
            index,
            positions,
            media_bias: None,
        }
    }

    #[test]
    fn test_party_attraction_picks_centrist() {
        let params = quiet_params();
        let parties = create_parties();
        let index = SpatialIndex::new();
        let positions = [0.05];
        let field = field(&params, &parties, &index, &positions);

        let mut agent = Agent::new(AgentId(0), 0.05, 0.5);
        let party = field.party_attraction(&mut agent);

        let centrist = parties.find_by_name("Centrist Bloc").unwrap().id;
        assert_eq!(party, Some(centrist));
        assert_eq!(agent.party, Some(centrist));
        assert!(agent.vx < 0.0);
        assert!((agent.vx + 0.05 * PARTY_PULL).abs() < 1e-15);
        assert_eq!(agent.vy, 0.0);
    }

    #[test]
    fn test_radicalization_amplifies_party_pull() {
        let params = quiet_params();
        let parties = create_parties();
        let index = SpatialIndex::new();
        let positions = [0.5, 0.5];
        let field = field(&params, &parties, &index, &positions);

        let mut calm = Agent::new(AgentId(0), 0.5, 0.6);
        let mut radical = Agent::new(AgentId(1), 0.5, 0.6).with_traits(0.1, 0.4);
        field.party_attraction(&mut calm);
        field.party_attraction(&mut radical);

        assert!(radical.vx.abs() > calm.vx.abs());
        assert!((radical.vx / calm.vx - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_affective_repulsion_pushes_apart() {
        let params = SimParams {
            affective_polarization: 1.0,
            ..quiet_params()
        };
        let parties = PartyRegistry::new();
        // Bucket agent 1 next to agent 0 while its recorded ideology is far away.
        let mut index = SpatialIndex::new();
        index.insert(AgentId(0), -0.45, 0.5);
        index.insert(AgentId(1), -0.3, 0.5);
        index.insert(AgentId(2), -0.4, 0.5);
        let positions = [-0.45, 0.6, -0.4];
        let field = field(&params, &parties, &index, &positions);

        let mut left = Agent::new(AgentId(0), -0.45, 0.5);
        field.affective_repulsion(&mut left);
        assert!((left.vx + REPULSION_STRENGTH).abs() < 1e-15);

        let mut right = Agent::new(AgentId(1), 0.6, 0.5);
        let mut index = SpatialIndex::new();
        index.insert(AgentId(0), 0.6, 0.5);
        index.insert(AgentId(1), 0.6, 0.5);
        let field = ForceField { index: &index, ..field };
        field.affective_repulsion(&mut right);
        assert!((right.vx - REPULSION_STRENGTH).abs() < 1e-15);
    }

    #[test]
    fn test_grid_neighbors_are_never_a_full_unit_apart() {
        let params = SimParams {
            affective_polarization: 1.0,
            ..quiet_params()
        };
        let parties = PartyRegistry::new();
        let population = Population::new(
            (0..23)
                .map(|i| Agent::new(AgentId(i), -1.1 + i as f64 * 0.1, 0.5))
                .collect(),
        );
        let mut index = SpatialIndex::new();
        index.rebuild(&population);
        let positions = population.ideologies();
        let field = field(&params, &parties, &index, &positions);

        for agent in population.agents() {
            let mut agent = agent.clone();
            field.affective_repulsion(&mut agent);
            assert_eq!(agent.vx, 0.0);
        }
    }

    #[test]
    fn test_repulsion_ignores_agents_outside_neighborhood() {
        let params = SimParams {
            affective_polarization: 1.0,
            ..quiet_params()
        };
        let parties = PartyRegistry::new();
        let population = Population::new(vec![
            Agent::new(AgentId(0), -1.0, 0.5),
            Agent::new(AgentId(1), 1.0, 0.5),
        ]);
        let mut index = SpatialIndex::new();
        index.rebuild(&population);
        let positions = population.ideologies();
        let field = field(&params, &parties, &index, &positions);

        let mut agent = population.agents()[0].clone();
        field.affective_repulsion(&mut agent);
        assert_eq!(agent.vx, 0.0);
    }

    #[test]
    fn test_social_influence_pulls_toward_friends() {
        let params = quiet_params();
        let parties = PartyRegistry::new();
        let index = SpatialIndex::new();
        let positions = [0.0, 0.4, 0.8];
        let field = field(&params, &parties, &index, &positions);

        let mut agent = Agent::new(AgentId(0), 0.0, 0.5)
            .with_traits(0.1, 0.2)
            .with_friends(vec![AgentId(1), AgentId(2)]);
        field.social_influence(&mut agent);

        let expected = (0.4 + 0.8) * FRIEND_PULL * 0.2;
        assert!((agent.vx - expected).abs() < 1e-15);

        let mut stubborn = Agent::new(AgentId(0), 0.0, 0.5).with_friends(vec![AgentId(2)]);
        field.social_influence(&mut stubborn);
        assert_eq!(stubborn.vx, 0.0);
    }

    #[test]
    fn test_media_push_scales_with_radicalization() {
        let params = SimParams {
            radicalization_scale: 2.0,
            ..quiet_params()
        };
        let parties = PartyRegistry::new();
        let index = SpatialIndex::new();
        let positions = [0.0];
        let field = ForceField {
            media_bias: Some(0.2),
            ..field(&params, &parties, &index, &positions)
        };

        let mut agent = Agent::new(AgentId(0), 0.0, 0.5).with_traits(0.1, 0.3);
        field.media_push(&mut agent);
        assert!((agent.vx - 0.2 * 0.3 * MEDIA_IMPACT * 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_noise_bounds() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let mut agent = Agent::new(AgentId(0), 0.0, 0.5);
            add_noise(&mut agent, 0.01, &mut rng);
            assert!(agent.vx.abs() <= 0.005);
            assert!(agent.vy.abs() <= 0.005);
        }
    }

    #[test]
    fn test_integrate_applies_friction_and_clamps() {
        let mut agent = Agent::new(AgentId(0), 1.0, 0.95).with_velocity(0.5, 0.2);
        integrate(&mut agent);
        assert_eq!(agent.x, 1.1);
        assert_eq!(agent.y, 1.0);
        assert!((agent.vx - 0.475).abs() < 1e-12);
        assert!((agent.vy - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_apply_forces_counts_adherents() {
        let mut world = World::new();
        let mut parties = PartyRegistry::new();
        parties.register(Party::new(PartyId(0), "Left", -0.5, "#ff0000", 0.3));
        parties.register(Party::new(PartyId(0), "Right", 0.5, "#0000ff", 0.7));
        world.insert_resource(parties);
        world.insert_resource(quiet_params());
        world.insert_resource(MediaShock::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(5)));
        let population = Population::new(vec![
            Agent::new(AgentId(0), -0.6, 0.5),
            Agent::new(AgentId(1), -0.4, 0.5),
            Agent::new(AgentId(2), 0.7, 0.5),
        ]);
        let mut index = SpatialIndex::new();
        index.rebuild(&population);
        world.insert_resource(index);
        world.insert_resource(population);

        let mut schedule = Schedule::default();
        schedule.add_systems(apply_forces);
        schedule.run(&mut world);

        let parties = world.resource::<PartyRegistry>();
        assert_eq!(parties.get(PartyId(0)).unwrap().strength, 2);
        assert_eq!(parties.get(PartyId(1)).unwrap().strength, 1);
        let population = world.resource::<Population>();
        assert_eq!(population.agents()[2].party, Some(PartyId(1)));
    }

    #[test]
    fn test_media_sampling_logs_direction() {
        let mut world = World::new();
        world.insert_resource(SimParams {
            media_frequency: 1.0,
            ..quiet_params()
        });
        world.insert_resource(Clock::new());
        world.insert_resource(MediaShock::default());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(6)));
        world.insert_resource(EventLog::new());

        let mut schedule = Schedule::default();
        schedule.add_systems(sample_media_shock);
        schedule.run(&mut world);

        let bias = world.resource::<MediaShock>().bias.unwrap();
        assert!(bias.abs() <= MEDIA_BIAS_SPAN);
        let log = world.resource::<EventLog>();
        assert_eq!(log.count_of(EventKind::MediaShock), 1);
        let expected = if bias > 0.0 { "(Right)" } else { "(Left)" };
        assert!(log.entries()[0].message.ends_with(expected));
    }
}
