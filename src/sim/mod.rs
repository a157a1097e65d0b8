//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by agent ID)
//! - No rendering or platform dependencies

pub mod agent;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod predator;
pub mod prey;
pub mod spawn;
pub mod tick;
pub mod world;
pub mod zone;

pub use agent::{AgentCore, PanicPhase, StimulusReceiver};
pub use geometry::{Rect, reflect, sd_circle};
pub use level::{LevelOutcome, LevelState, predator_count, target_count, total_prey, zone_scale};
pub use physics::ArenaPhysics;
pub use predator::{Predator, PredatorSteering, PreySnapshot};
pub use prey::{Prey, ZoneRef};
pub use spawn::{Placement, safe_placement};
pub use tick::{LevelOrchestrator, TickInput};
pub use world::{
    AgentId, AgentKind, Collider, ContactEvent, EntityHandle, EntityKind, LayerMask, NullFactory,
    PhysicsWorld, RayHit, SpatialQuery, SpawnFactory,
};
pub use zone::SafeZone;
