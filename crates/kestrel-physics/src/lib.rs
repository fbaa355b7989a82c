//! Rapier-backed ground and hit probes.
//!
//! [`CollisionWorld`] owns the static level geometry; [`RapierProbe`] answers
//! the [`GroundProbe`](kestrel_motion::GroundProbe) and
//! [`HitProbe`](kestrel_motion::HitProbe) queries against it using Rapier
//! 0.32's [`KinematicCharacterController`](rapier3d::control::KinematicCharacterController)
//! and query pipeline.

pub mod probe;

pub use probe::{CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS, RapierProbe};

use rapier3d::prelude::*;

/// Converts a workspace vector into Rapier's math type.
///
/// Rapier may use a different glam release than the workspace, so vectors
/// cross the boundary component-wise.
#[inline]
pub fn to_rapier(v: glam::Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

/// Converts a Rapier vector back into the workspace type.
#[inline]
pub fn from_rapier(v: Vector) -> glam::Vec3 {
    glam::Vec3::new(v.x, v.y, v.z)
}

/// Static collision geometry plus the Rapier state needed to query it.
///
/// Collider `user_data` carries the collider's layer bits, matched against
/// [`TargetMask`](kestrel_motion::TargetMask) by hit queries.
pub struct CollisionWorld {
    /// World-space gravity; only used when stepping.
    pub gravity: Vector,
    /// Timestep used by [`refresh`](Self::refresh).
    pub integration_parameters: IntegrationParameters,
    /// Pipeline stepped by [`refresh`](Self::refresh).
    pub physics_pipeline: PhysicsPipeline,
    /// Sleeping/awake body islands.
    pub island_manager: IslandManager,
    /// Broad-phase collision detection (also provides query pipeline).
    pub broad_phase: BroadPhaseBvh,
    /// Narrow phase; supplies the query dispatcher.
    pub narrow_phase: NarrowPhase,
    /// Fixed bodies carrying the level colliders.
    pub rigid_body_set: RigidBodySet,
    /// Level colliders; `user_data` holds layer bits.
    pub collider_set: ColliderSet,
    /// Unused by static geometry, required by the pipeline.
    pub impulse_joint_set: ImpulseJointSet,
    /// Unused by static geometry, required by the pipeline.
    pub multibody_joint_set: MultibodyJointSet,
    /// Continuous collision detection solver.
    pub ccd_solver: CCDSolver,
}

impl CollisionWorld {
    /// Empty world with a `1/60` s timestep.
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: 1.0 / 60.0,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, -9.81, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Adds a fixed box centred at `center` on collision `layers`.
    ///
    /// Call [`refresh`](Self::refresh) before querying new geometry.
    pub fn add_static_box(
        &mut self,
        center: glam::Vec3,
        half_extents: glam::Vec3,
        layers: u32,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_rapier(center))
            .build();
        let body_handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .user_data(u128::from(layers))
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Adds a 100 m square floor whose top surface is at `height`.
    pub fn add_floor(&mut self, height: f32, layers: u32) -> ColliderHandle {
        self.add_static_box(
            glam::Vec3::new(0.0, height - 0.5, 0.0),
            glam::Vec3::new(50.0, 0.5, 50.0),
            layers,
        )
    }

    /// Steps the pipeline once so the broad phase reflects every collider.
    pub fn refresh(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// A borrowed query view over the current geometry.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.rigid_body_set,
            &self.collider_set,
            filter,
        )
    }

    /// Layer bits stored on a collider, or 0 if it no longer exists.
    pub fn collider_layers(&self, handle: ColliderHandle) -> u32 {
        self.collider_set
            .get(handle)
            .map_or(0, |c| c.user_data as u32)
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new()
    }
}
