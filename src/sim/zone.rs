//! Safe zone
//!
//! A circular trigger. Geometry is fixed at placement; the only state that
//! matters lives on the prey (`safe`), which is what keeps the live counter
//! from double counting.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::LevelState;
use super::prey::Prey;
use super::world::EntityHandle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeZone {
    pub center: Vec2,
    /// Effective radius (base radius times level scale)
    pub radius: f32,
    pub scale: f32,
    #[serde(skip)]
    pub handle: Option<EntityHandle>,
}

impl SafeZone {
    pub fn new(center: Vec2, base_radius: f32, scale: f32) -> Self {
        Self {
            center,
            radius: base_radius * scale,
            scale,
            handle: None,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }

    /// A prey entered the trigger. Returns true if it was newly credited.
    pub fn on_prey_enter(&self, prey: &mut Prey, level: &mut LevelState) -> bool {
        prey.on_zone_enter(self);
        if !prey.is_alive() || prey.is_safe() {
            return false;
        }
        prey.mark_safe();
        level.add_live_count();
        log::debug!("Prey {:?} reached the zone", prey.core.id);
        true
    }
}
