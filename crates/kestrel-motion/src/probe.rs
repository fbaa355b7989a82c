//! Capability traits for ground contact and hit queries, plus an analytic
//! plane implementation used by tests and headless runs.
//!
//! Probes take `&self`: they are read-only queries against a world the core
//! does not own, and may be called re-entrantly from any role.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance below which a body counts as touching the ground plane.
pub const GROUND_EPS: f32 = 1.0e-3;

/// Normal speed (m/s) above which a body is leaving the ground.
const SEPARATION_EPS: f32 = 1.0e-4;

/// Result of moving the character through the world for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Resolved position after collision.
    pub position: Vec3,
    /// Whether the body has walkable support at the resolved position.
    pub grounded: bool,
}

/// A surface hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    /// World-space hit point.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// Collision layers a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetMask(pub u32);

impl TargetMask {
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// True if any bit of `layers` is in the mask.
    pub fn matches(self, layers: u32) -> bool {
        self.0 & layers != 0
    }
}

/// Ground contact capability consumed by the integrator.
pub trait GroundProbe {
    /// Whether `position` has walkable ground support.
    fn is_grounded(&self, position: Vec3) -> bool;

    /// Projects `velocity` onto the ground plane under `position`.
    ///
    /// Returns `None` when there is no ground to project onto.
    fn project_on_ground(&self, position: Vec3, velocity: Vec3) -> Option<Vec3>;

    /// Moves a body from `position` with `velocity` for `dt` seconds and
    /// resolves collisions, returning where it ended up.
    fn move_character(&self, position: Vec3, velocity: Vec3, dt: f32) -> GroundContact;
}

/// Ray query capability used for fire attempts.
pub trait HitProbe {
    /// Casts a ray from `origin` along unit `direction` up to `max_range`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        mask: TargetMask,
    ) -> Option<HitRecord>;
}

impl<T: GroundProbe + ?Sized> GroundProbe for &T {
    fn is_grounded(&self, position: Vec3) -> bool {
        (**self).is_grounded(position)
    }

    fn project_on_ground(&self, position: Vec3, velocity: Vec3) -> Option<Vec3> {
        (**self).project_on_ground(position, velocity)
    }

    fn move_character(&self, position: Vec3, velocity: Vec3, dt: f32) -> GroundContact {
        (**self).move_character(position, velocity, dt)
    }
}

impl<T: HitProbe + ?Sized> HitProbe for &T {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        mask: TargetMask,
    ) -> Option<HitRecord> {
        (**self).raycast(origin, direction, max_range, mask)
    }
}

/// A hit probe that never hits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHits;

impl HitProbe for NoHits {
    fn raycast(&self, _: Vec3, _: Vec3, _: f32, _: TargetMask) -> Option<HitRecord> {
        None
    }
}

/// An infinite plane acting as both ground and a hittable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGround {
    /// Any point on the plane.
    pub origin: Vec3,
    /// Unit normal pointing away from the solid side.
    pub normal: Vec3,
    /// Collision layers this plane belongs to.
    pub layers: u32,
}

impl PlaneGround {
    /// Horizontal floor at `height`.
    pub fn flat(height: f32) -> Self {
        Self {
            origin: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
            layers: 1,
        }
    }

    /// Plane through the world origin tilted `angle` radians about +X.
    ///
    /// Positive angles raise the ground toward +Z.
    pub fn slope(angle: f32) -> Self {
        Self {
            origin: Vec3::ZERO,
            normal: Vec3::new(0.0, angle.cos(), -angle.sin()),
            layers: 1,
        }
    }

    /// Signed distance from the plane, positive on the open side.
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.origin).dot(self.normal)
    }
}

impl GroundProbe for PlaneGround {
    fn is_grounded(&self, position: Vec3) -> bool {
        self.signed_distance(position) <= GROUND_EPS
    }

    fn project_on_ground(&self, position: Vec3, velocity: Vec3) -> Option<Vec3> {
        if !self.is_grounded(position) {
            return None;
        }
        Some(velocity - self.normal * velocity.dot(self.normal))
    }

    fn move_character(&self, position: Vec3, velocity: Vec3, dt: f32) -> GroundContact {
        let target = position + velocity * dt;
        let distance = self.signed_distance(target);
        let separating = velocity.dot(self.normal) > SEPARATION_EPS;

        if distance <= GROUND_EPS && !separating {
            GroundContact {
                position: target - self.normal * distance,
                grounded: true,
            }
        } else {
            GroundContact {
                position: target,
                grounded: false,
            }
        }
    }
}

impl HitProbe for PlaneGround {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        mask: TargetMask,
    ) -> Option<HitRecord> {
        if !mask.matches(self.layers) {
            return None;
        }
        let denom = direction.dot(self.normal);
        if denom >= -f32::EPSILON {
            return None;
        }
        let t = (self.origin - origin).dot(self.normal) / denom;
        if !(0.0..=max_range).contains(&t) {
            return None;
        }
        Some(HitRecord {
            point: origin + direction * t,
            normal: self.normal,
        })
    }
}
