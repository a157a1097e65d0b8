//! Prey agent
//!
//! Wanders on a fixed heading until startled. Once a prey has reached the
//! zone it is safe for good, and it keeps steering back toward the zone
//! center whenever it drifts outside the radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::{AgentCore, StimulusReceiver};
use super::zone::SafeZone;
use crate::steer_toward;

/// Zone geometry remembered by a prey (lookup only, no ownership)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRef {
    pub center: Vec2,
    pub radius: f32,
}

/// A prey agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prey {
    pub core: AgentCore,
    /// Monotonic: never reverts once set
    safe: bool,
    zone: Option<ZoneRef>,
    /// Cleared when a predator catches it; removed at the end of the tick
    pub(crate) alive: bool,
    /// Turn rate back toward the zone center
    steer_rate: f32,
}

impl Prey {
    pub fn new(core: AgentCore, steer_rate: f32) -> Self {
        Self {
            core,
            safe: false,
            zone: None,
            alive: true,
            steer_rate,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn zone(&self) -> Option<ZoneRef> {
        self.zone
    }

    /// Set the safe flag. Returns true only on the false -> true transition.
    pub(crate) fn mark_safe(&mut self) -> bool {
        if self.safe {
            return false;
        }
        self.safe = true;
        true
    }

    /// Trigger entry: always refresh the cached zone geometry
    pub fn on_zone_enter(&mut self, zone: &SafeZone) {
        self.zone = Some(ZoneRef {
            center: zone.center,
            radius: zone.radius,
        });
    }

    /// Steering decision for this tick
    pub fn steer(&mut self, dt: f32) {
        if !self.safe {
            return;
        }
        if let Some(zone) = self.zone {
            let offset = zone.center - self.core.pos;
            if offset.length() > zone.radius {
                if let Some(to_center) = offset.try_normalize() {
                    self.core.heading = steer_toward(self.core.heading, to_center, dt * self.steer_rate);
                }
            }
        }
    }
}

impl StimulusReceiver for Prey {
    fn on_direct_stimulus(&mut self, rng: &mut dyn rand::RngCore) {
        self.core.direct_stimulus(rng);
    }

    fn on_proximity_stimulus(&mut self, point: Vec2, rng: &mut dyn rand::RngCore) {
        self.core.proximity_stimulus(point, rng);
    }
}
