//! Rejection-sampling spawn placement
//!
//! Candidates are drawn uniformly from the map shrunk by the padding. The
//! first candidate whose padding disk is clear of every occupant wins. After
//! `MAX_PLACEMENT_ATTEMPTS` misses the last candidate is used anyway: a
//! crowded spawn is better than no spawn.

use glam::Vec2;
use rand::Rng;

use super::geometry::Rect;
use super::world::{LayerMask, SpatialQuery};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    /// Candidates drawn (1..=MAX_PLACEMENT_ATTEMPTS)
    pub attempts: u32,
    /// True when every candidate was occupied and the last one was kept
    pub overlapping: bool,
}

/// Find a spawn position inside `bounds` clear of colliders in `mask`
pub fn safe_placement<W, R>(
    bounds: Rect,
    padding: f32,
    world: &W,
    mask: LayerMask,
    rng: &mut R,
) -> Placement
where
    W: SpatialQuery + ?Sized,
    R: Rng + ?Sized,
{
    let area = bounds.shrink(padding);
    let mut position = area.center();

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        position = area.sample(rng);
        if !world.check_disk_occupied(position, padding, mask) {
            return Placement {
                position,
                attempts: attempt,
                overlapping: false,
            };
        }
    }

    log::warn!(
        "No free spot after {MAX_PLACEMENT_ATTEMPTS} attempts, spawning at ({:.2}, {:.2}) anyway",
        position.x,
        position.y
    );
    Placement {
        position,
        attempts: MAX_PLACEMENT_ATTEMPTS,
        overlapping: true,
    }
}
