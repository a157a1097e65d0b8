//! Reference physics world
//!
//! Agents are disks, the zone is a circular trigger and the walls are the
//! edges of the map rectangle. Contact detection is brute force, which is
//! plenty for a flock of at most fifteen bodies.
//!
//! Only prey/predator pairs report agent contacts (the layer collision
//! matrix); prey never collide with prey.

use std::collections::BTreeSet;

use glam::Vec2;

use super::geometry::{Rect, disks_overlap, ray_circle, ray_rect_exit, sd_circle};
use super::world::{
    AgentId, AgentKind, Collider, ContactEvent, LayerMask, PhysicsWorld, RayHit, SpatialQuery,
};

#[derive(Debug, Clone)]
struct Body {
    id: AgentId,
    kind: AgentKind,
    pos: Vec2,
    radius: f32,
}

/// Brute-force disk world
#[derive(Debug, Clone)]
pub struct ArenaPhysics {
    bounds: Rect,
    /// Sorted by id for deterministic iteration
    bodies: Vec<Body>,
    zone: Option<(Vec2, f32)>,
    /// Bodies currently overlapping the zone trigger
    in_zone: BTreeSet<AgentId>,
    /// Agent pairs currently touching (`a < b`)
    touching: BTreeSet<(AgentId, AgentId)>,
}

impl ArenaPhysics {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            bodies: Vec::new(),
            zone: None,
            in_zone: BTreeSet::new(),
            touching: BTreeSet::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn wall_contacts(&self, body: &Body, events: &mut Vec<ContactEvent>) {
        let b = &self.bounds;
        let r = body.radius;
        let p = body.pos;
        let walls = [
            (b.min.x - (p.x - r), Vec2::X),
            ((p.x + r) - b.max.x, Vec2::NEG_X),
            (b.min.y - (p.y - r), Vec2::Y),
            ((p.y + r) - b.max.y, Vec2::NEG_Y),
        ];
        for (penetration, normal) in walls {
            if penetration > 0.0 {
                events.push(ContactEvent::Wall {
                    agent: body.id,
                    normal,
                    penetration,
                });
            }
        }
    }
}

impl SpatialQuery for ArenaPhysics {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let mut best: Option<RayHit> = None;
        let mut consider = |hit: Option<(f32, Vec2)>, collider: Collider| {
            if let Some((t, normal)) = hit {
                let closer = best.is_none_or(|b| t < b.distance);
                if t <= max_distance && closer {
                    best = Some(RayHit {
                        point: origin + dir * t,
                        normal,
                        distance: t,
                        collider,
                    });
                }
            }
        };

        if mask.contains(LayerMask::AGENT) {
            for body in &self.bodies {
                consider(ray_circle(origin, dir, body.pos, body.radius), Collider::Agent(body.id));
            }
        }
        if mask.contains(LayerMask::ZONE) {
            if let Some((center, radius)) = self.zone {
                consider(ray_circle(origin, dir, center, radius), Collider::Zone);
            }
        }
        if mask.contains(LayerMask::WALL) && self.bounds.contains(origin) {
            consider(ray_rect_exit(origin, dir, &self.bounds), Collider::Wall);
        }
        best
    }

    fn overlap_disk(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<Collider> {
        let mut hits = Vec::new();

        if mask.contains(LayerMask::AGENT) {
            hits.extend(
                self.bodies
                    .iter()
                    .filter(|b| disks_overlap(center, radius, b.pos, b.radius))
                    .map(|b| Collider::Agent(b.id)),
            );
        }
        if mask.contains(LayerMask::ZONE) {
            if let Some((zone_center, zone_radius)) = self.zone {
                if sd_circle(center, zone_center, zone_radius) < radius {
                    hits.push(Collider::Zone);
                }
            }
        }
        if mask.contains(LayerMask::GROUND) && self.bounds.contains(center) {
            hits.push(Collider::Ground);
        }
        if mask.contains(LayerMask::WALL) && !self.bounds.shrink(radius).contains(center) {
            hits.push(Collider::Wall);
        }

        hits.sort();
        hits.dedup();
        hits
    }
}

impl PhysicsWorld for ArenaPhysics {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.zone = None;
        self.in_zone.clear();
        self.touching.clear();
    }

    fn insert_agent(&mut self, id: AgentId, kind: AgentKind, position: Vec2, radius: f32) {
        self.remove_agent(id);
        self.bodies.push(Body {
            id,
            kind,
            pos: position,
            radius,
        });
        self.bodies.sort_by_key(|b| b.id);
    }

    fn remove_agent(&mut self, id: AgentId) {
        self.bodies.retain(|b| b.id != id);
        self.in_zone.remove(&id);
        self.touching.retain(|&(a, b)| a != id && b != id);
    }

    fn move_agent(&mut self, id: AgentId, position: Vec2) {
        if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
            body.pos = position;
        }
    }

    fn set_zone(&mut self, zone: Option<(Vec2, f32)>) {
        self.zone = zone;
        self.in_zone.clear();
    }

    fn step(&mut self) -> Vec<ContactEvent> {
        let mut events = Vec::new();

        for body in &self.bodies {
            self.wall_contacts(body, &mut events);
        }

        // Zone trigger: report entries only
        if let Some((center, radius)) = self.zone {
            for body in &self.bodies {
                let inside = disks_overlap(body.pos, body.radius, center, radius);
                if inside {
                    if self.in_zone.insert(body.id) {
                        events.push(ContactEvent::ZoneEntered { agent: body.id });
                    }
                } else {
                    self.in_zone.remove(&body.id);
                }
            }
        }

        // Prey/predator contacts: report new touches only
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                if a.kind == b.kind {
                    continue;
                }
                let pair = (a.id, b.id);
                if disks_overlap(a.pos, a.radius, b.pos, b.radius) {
                    if self.touching.insert(pair) {
                        events.push(ContactEvent::Agents { a: a.id, b: b.id });
                    }
                } else {
                    self.touching.remove(&pair);
                }
            }
        }

        events
    }
}
