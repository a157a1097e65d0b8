//! Planar geometry primitives
//!
//! The ground plane is (x, y) in `Vec2`; "up" is out of the plane.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (map bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle centered on the origin
    pub fn from_half_extents(half: Vec2) -> Self {
        Self::new(-half.abs(), half.abs())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrink by `padding` on every side. Axes that would invert collapse to
    /// their center line.
    pub fn shrink(&self, padding: f32) -> Self {
        let center = self.center();
        let mut min = self.min + Vec2::splat(padding);
        let mut max = self.max - Vec2::splat(padding);
        if min.x > max.x {
            min.x = center.x;
            max.x = center.x;
        }
        if min.y > max.y {
            min.y = center.y;
            max.y = center.y;
        }
        Self { min, max }
    }

    /// Uniform sample inside the rectangle (degenerate axes return the center line)
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let x = if self.min.x < self.max.x {
            rng.random_range(self.min.x..self.max.x)
        } else {
            self.min.x
        };
        let y = if self.min.y < self.max.y {
            rng.random_range(self.min.y..self.max.y)
        } else {
            self.min.y
        };
        Vec2::new(x, y)
    }
}

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Whether two disks overlap (touching does not count)
#[inline]
pub fn disks_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Reflect a direction off a surface with given normal
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Ray/circle intersection
///
/// Returns the distance along the (unit) ray to the first surface hit and
/// the outward surface normal there. A ray starting inside the circle hits
/// at distance 0 with the normal pointing from the center to the origin.
pub fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let to_origin = origin - center;
    if to_origin.length_squared() <= radius * radius {
        let normal = to_origin.try_normalize().unwrap_or(-dir);
        return Some((0.0, normal));
    }

    // |o + t d - c|^2 = r^2 with |d| = 1
    let b = to_origin.dot(dir);
    let c = to_origin.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let point = origin + dir * t;
    Some((t, (point - center) / radius))
}

/// Ray leaving a rectangle from the inside
///
/// Returns the distance to the wall crossed first and the inward wall normal.
pub fn ray_rect_exit(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<(f32, Vec2)> {
    let mut best: Option<(f32, Vec2)> = None;
    let mut consider = |t: f32, normal: Vec2| {
        if t >= 0.0 && best.is_none_or(|(bt, _)| t < bt) {
            best = Some((t, normal));
        }
    };

    if dir.x > 0.0 {
        consider((rect.max.x - origin.x) / dir.x, Vec2::NEG_X);
    } else if dir.x < 0.0 {
        consider((rect.min.x - origin.x) / dir.x, Vec2::X);
    }
    if dir.y > 0.0 {
        consider((rect.max.y - origin.y) / dir.y, Vec2::NEG_Y);
    } else if dir.y < 0.0 {
        consider((rect.min.y - origin.y) / dir.y, Vec2::Y);
    }
    best
}
