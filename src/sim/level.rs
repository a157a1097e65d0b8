//! Level parameters and per-level counters

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Prey spawned on a level
pub fn total_prey(level: u32) -> u32 {
    BASE_PREY.saturating_add(level.saturating_sub(1)).min(MAX_PREY)
}

/// Prey that must reach the zone: floor(total * 0.7), in integer arithmetic
pub fn target_count(total_prey: u32) -> u32 {
    total_prey * TARGET_TENTHS / 10
}

/// Predators spawned on a level
pub fn predator_count(level: u32) -> u32 {
    if level < PREDATOR_START_LEVEL {
        0
    } else {
        (level - PREDATOR_START_LEVEL).saturating_add(1).min(MAX_PREDATORS)
    }
}

/// Zone radius multiplier
pub fn zone_scale(level: u32) -> f32 {
    (1.0 + level.saturating_sub(1) as f32 * ZONE_GROWTH_PER_LEVEL).min(MAX_ZONE_SCALE)
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Won,
    Lost,
}

/// Counters and parameters of the level in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub current_level: u32,
    pub live_count: u32,
    pub death_count: u32,
    pub target_count: u32,
    /// Effective limit for this level
    pub death_limit: u32,
    /// Limit as configured, before capping to the flock
    pub configured_death_limit: u32,
    pub is_active: bool,
    pub map_bounds: Rect,
    pub total_prey: u32,
    pub predator_count: u32,
    pub zone_scale: f32,
    /// Simulation ticks since level start
    pub time_ticks: u64,
}

impl LevelState {
    /// Fresh counters for `level` (0 is clamped to 1)
    pub fn new(level: u32, death_limit: u32, map_bounds: Rect) -> Self {
        let level = level.max(1);
        let total = total_prey(level);
        let target = target_count(total);
        // Never demand more deaths than it takes to make the target unreachable
        let configured_death_limit = death_limit;
        let death_limit = death_limit.max(1).min(total - target + 1);
        if death_limit != configured_death_limit {
            log::debug!(
                "Level {level}: death limit {configured_death_limit} adjusted to {death_limit} ({total} prey, target {target})"
            );
        }

        Self {
            current_level: level,
            live_count: 0,
            death_count: 0,
            target_count: target,
            death_limit,
            configured_death_limit,
            is_active: true,
            map_bounds,
            total_prey: total,
            predator_count: predator_count(level),
            zone_scale: zone_scale(level),
            time_ticks: 0,
        }
    }

    /// A prey reached the zone. Ignored once the level is over.
    pub fn add_live_count(&mut self) {
        if !self.is_active {
            log::debug!("Ignoring live count after level end");
            return;
        }
        if self.live_count + self.death_count >= self.total_prey {
            log::warn!("Live count would exceed the flock size, ignoring");
            return;
        }
        self.live_count += 1;
    }

    /// A prey was killed. Ignored once the level is over.
    pub fn add_death_count(&mut self) {
        if !self.is_active {
            log::debug!("Ignoring death count after level end");
            return;
        }
        if self.live_count + self.death_count >= self.total_prey {
            log::warn!("Death count would exceed the flock size, ignoring");
            return;
        }
        self.death_count += 1;
    }

    /// Win takes precedence over loss
    pub fn evaluate(&self) -> Option<LevelOutcome> {
        if self.live_count >= self.target_count {
            Some(LevelOutcome::Won)
        } else if self.death_count >= self.death_limit {
            Some(LevelOutcome::Lost)
        } else {
            None
        }
    }
}
