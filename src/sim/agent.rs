//! Shared agent state machine
//!
//! Prey and predators both run the same two-state panic machine:
//!
//! ```text
//!   Idle --stimulus--> Panicked { remaining } --countdown hits 0--> Idle
//! ```
//!
//! A stimulus received while already panicked changes the heading but does
//! not restart the countdown. The countdown is advanced explicitly during the
//! per-tick state phase; nothing suspends.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::reflect;
use super::world::{AgentId, EntityHandle};
use crate::random_heading;
use crate::settings::AgentTuning;

/// Panic state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PanicPhase {
    Idle,
    /// Elevated speed until `remaining` reaches zero
    Panicked { remaining: f32 },
}

/// Input-driven stimuli, implemented by every agent variant
pub trait StimulusReceiver {
    /// Tapped directly: bolt in a random direction
    fn on_direct_stimulus(&mut self, rng: &mut dyn rand::RngCore);
    /// Tap landed nearby: flee from `point`
    fn on_proximity_stimulus(&mut self, point: Vec2, rng: &mut dyn rand::RngCore);
}

/// State common to every agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCore {
    pub id: AgentId,
    pub pos: Vec2,
    /// Unit heading in the ground plane
    pub heading: Vec2,
    /// Last non-zero heading (orientation for rendering)
    pub facing: Vec2,
    pub speed: f32,
    pub phase: PanicPhase,
    pub tuning: AgentTuning,
    /// Presentation entity, if a factory created one
    #[serde(skip)]
    pub handle: Option<EntityHandle>,
}

impl AgentCore {
    pub fn new(id: AgentId, pos: Vec2, heading: Vec2, tuning: AgentTuning) -> Self {
        Self {
            id,
            pos,
            heading,
            facing: heading,
            speed: tuning.base_speed,
            phase: PanicPhase::Idle,
            tuning,
            handle: None,
        }
    }

    pub fn is_panicked(&self) -> bool {
        matches!(self.phase, PanicPhase::Panicked { .. })
    }

    /// Enter the panicked state. First panic wins: an active countdown is kept.
    pub fn panic(&mut self) {
        if self.is_panicked() {
            return;
        }
        self.phase = PanicPhase::Panicked {
            remaining: self.tuning.panic_duration,
        };
        self.speed = self.tuning.panic_speed();
    }

    /// Tick the panic countdown; restores base speed on expiry
    pub fn advance_panic(&mut self, dt: f32) {
        if let PanicPhase::Panicked { remaining } = &mut self.phase {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.phase = PanicPhase::Idle;
                self.speed = self.tuning.base_speed;
            }
        }
    }

    pub fn direct_stimulus<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.heading = random_heading(rng);
        self.panic();
    }

    pub fn proximity_stimulus<R: Rng + ?Sized>(&mut self, point: Vec2, rng: &mut R) {
        // Tap exactly on the agent: no "away", pick any direction
        self.heading = (self.pos - point)
            .try_normalize()
            .unwrap_or_else(|| random_heading(rng));
        self.panic();
    }

    /// Move along the heading and update facing
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.heading * self.speed * dt;
        if self.heading != Vec2::ZERO {
            self.facing = self.heading;
        }
    }

    /// Bounce off a wall: reflect the heading and push back inside
    pub fn bounce(&mut self, normal: Vec2, penetration: f32) {
        self.pos += normal * penetration;
        // Reflect only when heading into the wall (corners report two normals)
        if self.heading.dot(normal) < 0.0 {
            self.heading = reflect(self.heading, normal).try_normalize().unwrap_or(normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn core() -> AgentCore {
        AgentCore::new(AgentId(1), Vec2::ZERO, Vec2::X, AgentTuning::PREY)
    }

    #[test]
    fn test_panic_countdown() {
        let mut agent = core();
        agent.panic();
        assert!(agent.is_panicked());
        assert_eq!(agent.speed, 6.0);

        agent.advance_panic(0.6);
        assert!(agent.is_panicked());
        agent.advance_panic(0.5);
        assert_eq!(agent.phase, PanicPhase::Idle);
        assert_eq!(agent.speed, 3.0);
    }

    #[test]
    fn test_panic_first_wins() {
        let mut agent = core();
        agent.panic();
        agent.advance_panic(0.7);
        agent.panic();
        match agent.phase {
            PanicPhase::Panicked { remaining } => assert!((remaining - 0.3).abs() < 1e-5),
            PanicPhase::Idle => panic!("should still be panicked"),
        }
    }

    #[test]
    fn test_proximity_stimulus_flees_point() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut agent = core();
        agent.pos = Vec2::new(2.0, 0.0);
        agent.proximity_stimulus(Vec2::new(1.0, 0.0), &mut rng);
        assert_eq!(agent.heading, Vec2::X);
        assert!(agent.is_panicked());

        // Tap on top of the agent still yields a unit heading
        agent.proximity_stimulus(agent.pos, &mut rng);
        assert!((agent.heading.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_integrate_and_bounce() {
        let mut agent = core();
        agent.integrate(0.5);
        assert_eq!(agent.pos, Vec2::new(1.5, 0.0));
        assert_eq!(agent.facing, Vec2::X);

        agent.bounce(Vec2::NEG_X, 0.25);
        assert_eq!(agent.pos, Vec2::new(1.25, 0.0));
        assert!((agent.heading - Vec2::NEG_X).length() < 1e-6);

        // Already moving away from the wall: keep heading
        agent.bounce(Vec2::NEG_X, 0.0);
        assert!((agent.heading - Vec2::NEG_X).length() < 1e-6);
    }
}
