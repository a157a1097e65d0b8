//! Predator agent
//!
//! While calm, a predator re-targets the nearest catchable prey every tick
//! and heads straight for it. With nothing to chase it wanders, picking a
//! new random heading every 1-2 seconds. Either way it probes ahead for the
//! safe zone and slides around it along the tangent instead of entering.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::{AgentCore, StimulusReceiver};
use super::world::{AgentId, LayerMask, RayHit, SpatialQuery};
use crate::settings::Settings;
use crate::{random_heading, steer_toward};

/// Previous-tick view of a prey, read by predators while steering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreySnapshot {
    pub id: AgentId,
    pub pos: Vec2,
    /// Alive and not yet safe
    pub catchable: bool,
}

/// Predator steering tunables, copied from settings at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredatorSteering {
    pub probe_distance: f32,
    pub avoid_rate: f32,
    pub wander_interval: (f32, f32),
}

impl PredatorSteering {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            probe_distance: settings.avoid_probe_distance,
            avoid_rate: settings.avoid_steer_rate,
            wander_interval: settings.wander_interval,
        }
    }

    fn next_wander_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (lo, hi) = self.wander_interval;
        if lo < hi { rng.random_range(lo..=hi) } else { lo }
    }
}

/// A predator agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predator {
    pub core: AgentCore,
    pub steering: PredatorSteering,
    /// Seconds until the next wander re-heading
    wander_timer: f32,
}

impl Predator {
    pub fn new<R: Rng + ?Sized>(core: AgentCore, steering: PredatorSteering, rng: &mut R) -> Self {
        let wander_timer = steering.next_wander_delay(rng);
        Self {
            core,
            steering,
            wander_timer,
        }
    }

    /// Nearest catchable prey by planar distance (ties go to the lowest id)
    pub fn nearest_prey<'a>(&self, prey: &'a [PreySnapshot]) -> Option<&'a PreySnapshot> {
        let pos = self.core.pos;
        prey.iter()
            .filter(|p| p.catchable)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .total_cmp(&b.pos.distance_squared(pos))
                    .then(a.id.cmp(&b.id))
            })
    }

    /// Steering decision for this tick. Panicked predators just run.
    pub fn steer<W, R>(&mut self, prey: &[PreySnapshot], world: &W, dt: f32, rng: &mut R)
    where
        W: SpatialQuery + ?Sized,
        R: Rng + ?Sized,
    {
        if self.core.is_panicked() {
            return;
        }

        let chase = self
            .nearest_prey(prey)
            .and_then(|target| (target.pos - self.core.pos).try_normalize());
        match chase {
            // Hold the deflected course while the chase line still runs into the zone
            Some(dir) if self.probe_zone(world, dir).is_some() => {}
            Some(dir) => self.core.heading = dir,
            None => self.wander(dt, rng),
        }

        self.avoid_zone(world, dt);
    }

    fn probe_zone<W: SpatialQuery + ?Sized>(&self, world: &W, dir: Vec2) -> Option<RayHit> {
        world.raycast(self.core.pos, dir, self.steering.probe_distance, LayerMask::ZONE)
    }

    fn wander<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            self.core.heading = random_heading(rng);
            self.wander_timer = self.steering.next_wander_delay(rng);
        }
    }

    /// Deflect along the zone surface when the probe ray hits it
    fn avoid_zone<W: SpatialQuery + ?Sized>(&mut self, world: &W, dt: f32) {
        let heading = self.core.heading;
        let Some(hit) = self.probe_zone(world, heading) else {
            return;
        };

        // Planar cross(normal, up)
        let mut tangent = hit.normal.perp();
        if tangent.dot(heading) < 0.0 {
            tangent = -tangent;
        }
        self.core.heading = steer_toward(heading, tangent, dt * self.steering.avoid_rate);
    }
}

impl StimulusReceiver for Predator {
    fn on_direct_stimulus(&mut self, rng: &mut dyn rand::RngCore) {
        self.core.direct_stimulus(rng);
    }

    fn on_proximity_stimulus(&mut self, point: Vec2, rng: &mut dyn rand::RngCore) {
        self.core.proximity_stimulus(point, rng);
    }
}
