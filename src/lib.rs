//! Herd Dash - a tick-based predator/prey herding game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (agents, steering, level orchestration)
//! - `platform`: Logging, fixed timestep and pointer input plumbing
//! - `persistence`: Key-value storage for progress
//! - `settings`: Data-driven game balance and tunables
//! - `ui`: HUD collaborator
//! - `records`: Best level reached
//! - `autopilot`: Scripted taps for demo runs

pub mod autopilot;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;
pub mod ui;

pub use records::BestLevel;
pub use settings::{AgentTuning, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Prey spawned on level 1 is `BASE_PREY`, one more per level after that
    pub const BASE_PREY: u32 = 2;
    /// Prey count cap
    pub const MAX_PREY: u32 = 10;
    /// Fraction of the flock (in tenths) that must reach the zone
    pub const TARGET_TENTHS: u32 = 7;

    /// First level with predators
    pub const PREDATOR_START_LEVEL: u32 = 5;
    /// Predator count cap
    pub const MAX_PREDATORS: u32 = 5;

    /// Zone radius grows by this fraction per level
    pub const ZONE_GROWTH_PER_LEVEL: f32 = 0.2;
    /// Zone radius multiplier cap
    pub const MAX_ZONE_SCALE: f32 = 3.0;

    /// Rejection-sampling budget for spawn placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 30;

    /// Persistence key for the best level reached
    pub const BEST_LEVEL_KEY: &str = "BestLevel";
}

/// Random unit vector in the ground plane
#[inline]
pub fn random_heading<R: rand::Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(theta.cos(), theta.sin())
}

/// Interpolate a heading toward `target` by `t` (clamped to [0, 1]) and keep it unit length
#[inline]
pub fn steer_toward(heading: Vec2, target: Vec2, t: f32) -> Vec2 {
    let blended = heading.lerp(target, t.clamp(0.0, 1.0));
    blended.try_normalize().unwrap_or(heading)
}
