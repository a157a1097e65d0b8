//! Collaborator contracts between the simulation and its host
//!
//! The simulation never resolves collisions itself. A `PhysicsWorld` owns the
//! bodies, answers spatial queries and reports contacts after each step.
//! Entity creation for presentation goes through a `SpawnFactory`.

use std::ops::BitOr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Agent identifier, allocated in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Agent species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Prey,
    Predator,
}

/// Everything the spawn factory can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Prey,
    Predator,
    Zone,
}

impl From<AgentKind> for EntityKind {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Prey => EntityKind::Prey,
            AgentKind::Predator => EntityKind::Predator,
        }
    }
}

/// Opaque handle returned by the spawn factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Collision layer bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const AGENT: Self = Self(1 << 0);
    pub const ZONE: Self = Self(1 << 1);
    pub const GROUND: Self = Self(1 << 2);
    pub const WALL: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Something a query can hit. Ordered so query results sort deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collider {
    Agent(AgentId),
    Zone,
    Ground,
    Wall,
}

impl Collider {
    pub fn layer(&self) -> LayerMask {
        match self {
            Collider::Agent(_) => LayerMask::AGENT,
            Collider::Zone => LayerMask::ZONE,
            Collider::Ground => LayerMask::GROUND,
            Collider::Wall => LayerMask::WALL,
        }
    }
}

/// Result of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    /// Surface normal at the hit point, facing the ray origin's side
    pub normal: Vec2,
    pub distance: f32,
    pub collider: Collider,
}

/// Contact produced by a physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Agent pushed into a wall. `normal` points back into the arena.
    Wall {
        agent: AgentId,
        normal: Vec2,
        penetration: f32,
    },
    /// Agent body started overlapping the zone trigger
    ZoneEntered { agent: AgentId },
    /// Two agents started touching (`a < b`)
    Agents { a: AgentId, b: AgentId },
}

/// Overlap and ray queries
pub trait SpatialQuery {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    /// Colliders overlapping a disk, sorted and without duplicates
    fn overlap_disk(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Collider>;

    fn check_disk_occupied(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        !self.overlap_disk(center, radius, mask).is_empty()
    }
}

/// Body bookkeeping and contact stepping
pub trait PhysicsWorld: SpatialQuery {
    /// Map bounds (walls sit on its edges)
    fn bounds(&self) -> Rect;
    /// Remove every body and the zone
    fn clear(&mut self);
    fn insert_agent(&mut self, id: AgentId, kind: AgentKind, position: Vec2, radius: f32);
    fn remove_agent(&mut self, id: AgentId);
    fn move_agent(&mut self, id: AgentId, position: Vec2);
    fn set_zone(&mut self, zone: Option<(Vec2, f32)>);
    /// Detect contacts at current body positions, in ascending agent order
    fn step(&mut self) -> Vec<ContactEvent>;
}

/// Creates presentation entities for simulation objects
pub trait SpawnFactory {
    fn spawn(&mut self, kind: EntityKind, position: Vec2) -> EntityHandle;
    fn despawn(&mut self, handle: EntityHandle);
    fn despawn_all(&mut self, kind: EntityKind);
}

/// Factory for headless runs: hands out sequential handles
#[derive(Debug, Default)]
pub struct NullFactory {
    next: u64,
}

impl SpawnFactory for NullFactory {
    fn spawn(&mut self, _kind: EntityKind, _position: Vec2) -> EntityHandle {
        self.next += 1;
        EntityHandle(self.next)
    }

    fn despawn(&mut self, _handle: EntityHandle) {}

    fn despawn_all(&mut self, _kind: EntityKind) {}
}
