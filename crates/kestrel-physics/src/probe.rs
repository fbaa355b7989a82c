//! Capsule character probe backed by a Rapier character controller.

use glam::Vec3;
use kestrel_motion::{GroundContact, GroundProbe, HitProbe, HitRecord, TargetMask};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::math::Pose;
use rapier3d::prelude::*;
use tracing::trace;

use crate::{CollisionWorld, from_rapier, to_rapier};

/// Capsule half-height of the cylindrical segment (meters).
pub const CAPSULE_HALF_HEIGHT: f32 = 0.6;
/// Capsule radius (meters).
pub const CAPSULE_RADIUS: f32 = 0.3;
/// Extra distance below the capsule still counted as standing.
const GROUND_TOLERANCE: f32 = 0.05;

/// Ground and hit probe for a 1.8 m capsule character.
///
/// Character positions are at the feet; the capsule centre sits
/// `CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS` above them.
pub struct RapierProbe {
    world: CollisionWorld,
    controller: KinematicCharacterController,
    shape: Capsule,
}

impl RapierProbe {
    /// Wraps `world`. The world is refreshed so queries see all geometry.
    pub fn new(mut world: CollisionWorld) -> Self {
        world.refresh();

        let controller = KinematicCharacterController {
            max_slope_climb_angle: std::f32::consts::FRAC_PI_4, // 45°
            min_slope_slide_angle: std::f32::consts::FRAC_PI_4,
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(0.5),
                min_width: CharacterLength::Absolute(0.3),
                include_dynamic_bodies: false,
            }),
            snap_to_ground: Some(CharacterLength::Absolute(0.2)),
            offset: CharacterLength::Absolute(0.01),
            ..Default::default()
        };

        Self {
            world,
            controller,
            shape: Capsule::new_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
        }
    }

    /// Foot-to-centre offset.
    #[inline]
    fn center_height() -> f32 {
        CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS
    }

    fn center(position: Vec3) -> Vec3 {
        position + Vec3::Y * Self::center_height()
    }

    /// Downward cast from the capsule centre, returning the surface normal.
    fn ground_hit(&self, position: Vec3) -> Option<Vector> {
        let qp = self.world.query_pipeline(QueryFilter::default());
        let ray = Ray::new(to_rapier(Self::center(position)), Vector::new(0.0, -1.0, 0.0));
        let max_distance = Self::center_height() + GROUND_TOLERANCE;
        qp.cast_ray_and_get_normal(&ray, max_distance, true)
            .map(|(_, intersection)| intersection.normal)
    }
}

impl GroundProbe for RapierProbe {
    fn is_grounded(&self, position: Vec3) -> bool {
        self.ground_hit(position).is_some()
    }

    fn project_on_ground(&self, position: Vec3, velocity: Vec3) -> Option<Vec3> {
        let normal = from_rapier(self.ground_hit(position)?).normalize_or_zero();
        if normal == Vec3::ZERO {
            return None;
        }
        Some(velocity - normal * velocity.dot(normal))
    }

    fn move_character(&self, position: Vec3, velocity: Vec3, dt: f32) -> GroundContact {
        let qp = self.world.query_pipeline(QueryFilter::default());
        let pose = Pose::from_translation(to_rapier(Self::center(position)));
        let desired = to_rapier(velocity * dt);

        let corrected = self
            .controller
            .move_shape(dt, &qp, &self.shape, &pose, desired, |_| {});

        let next = position + from_rapier(corrected.translation);
        trace!(?next, grounded = corrected.grounded, "character moved");
        GroundContact {
            position: next,
            grounded: corrected.grounded,
        }
    }
}

impl HitProbe for RapierProbe {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        mask: TargetMask,
    ) -> Option<HitRecord> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_range <= 0.0 {
            return None;
        }

        let on_layer =
            |_: ColliderHandle, collider: &Collider| mask.matches(collider.user_data as u32);
        let filter = QueryFilter::new().predicate(&on_layer);
        let qp = self.world.query_pipeline(filter);

        let ray = Ray::new(to_rapier(origin), to_rapier(direction));
        let (_, intersection) = qp.cast_ray_and_get_normal(&ray, max_range, true)?;
        Some(HitRecord {
            point: from_rapier(ray.point_at(intersection.time_of_impact)),
            normal: from_rapier(intersection.normal),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_motion::{InputSample, KinematicState, MotionParams, advance};

    const DT: f32 = 1.0 / 60.0;
    const FLOOR: u32 = 0b01;
    const TARGETS: u32 = 0b10;

    fn floor_probe() -> RapierProbe {
        let mut world = CollisionWorld::new();
        world.add_floor(0.0, FLOOR);
        RapierProbe::new(world)
    }

    fn probe_with_wall() -> RapierProbe {
        let mut world = CollisionWorld::new();
        world.add_floor(0.0, FLOOR);
        // Wall face at z = 10.
        world.add_static_box(Vec3::new(0.0, 2.0, 10.5), Vec3::new(5.0, 2.0, 0.5), TARGETS);
        RapierProbe::new(world)
    }

    #[test]
    fn test_grounded_on_floor() {
        let probe = floor_probe();
        assert!(probe.is_grounded(Vec3::ZERO));
        assert!(probe.is_grounded(Vec3::new(3.0, 0.02, -4.0)));
        assert!(!probe.is_grounded(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_projection_on_flat_floor_drops_vertical() {
        let probe = floor_probe();
        let projected = probe
            .project_on_ground(Vec3::ZERO, Vec3::new(1.0, -0.5, 2.0))
            .expect("floor under the character");
        assert!(projected.y.abs() < 1e-4);
        assert!((projected.x - 1.0).abs() < 1e-4);
        assert!((projected.z - 2.0).abs() < 1e-4);
        assert!(probe.project_on_ground(Vec3::new(0.0, 5.0, 0.0), Vec3::X).is_none());
    }

    #[test]
    fn test_falling_character_lands_on_floor() {
        let probe = floor_probe();
        let params = MotionParams::default();
        let mut state = KinematicState::spawn(Vec3::new(0.0, 2.0, 0.0), &probe);
        assert!(!state.is_grounded);

        for _ in 0..120 {
            state = advance(&state, &InputSample::NEUTRAL, DT, &params, &probe).unwrap();
        }
        assert!(state.position.y.abs() < 0.1, "y = {}", state.position.y);
        assert!(probe.is_grounded(state.position));
        assert!(!state.is_jumping);
    }

    #[test]
    fn test_walking_stays_on_floor() {
        let probe = floor_probe();
        let params = MotionParams::default();
        let mut state = KinematicState::spawn(Vec3::ZERO, &probe);
        let forward = InputSample {
            move_direction: glam::Vec2::new(0.0, 1.0),
            ..InputSample::NEUTRAL
        };

        for _ in 0..60 {
            state = advance(&state, &forward, DT, &params, &probe).unwrap();
        }
        assert!(state.position.z > 1.0, "z = {}", state.position.z);
        assert!(state.position.y.abs() < 0.1, "y = {}", state.position.y);
    }

    #[test]
    fn test_raycast_hits_wall_with_normal() {
        let probe = probe_with_wall();
        let hit = probe
            .raycast(Vec3::new(0.0, 1.6, 0.0), Vec3::Z, 100.0, TargetMask::ALL)
            .expect("wall ahead");
        assert!((hit.point.z - 10.0).abs() < 1e-3, "point = {:?}", hit.point);
        assert!(hit.normal.z < -0.99, "normal = {:?}", hit.normal);
    }

    #[test]
    fn test_raycast_respects_mask_and_range() {
        let probe = probe_with_wall();
        let origin = Vec3::new(0.0, 1.6, 0.0);
        assert!(probe.raycast(origin, Vec3::Z, 100.0, TargetMask(FLOOR)).is_none());
        assert!(probe.raycast(origin, Vec3::Z, 100.0, TargetMask(TARGETS)).is_some());
        assert!(probe.raycast(origin, Vec3::Z, 5.0, TargetMask::ALL).is_none());
        assert!(probe.raycast(origin, Vec3::ZERO, 100.0, TargetMask::ALL).is_none());
    }
}
