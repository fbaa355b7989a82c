use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::probe::GroundProbe;

/// Kinematic state of one character, owned by whichever participant holds
/// simulation authority and replicated read-only to everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    /// World position of the character's feet.
    pub position: Vec3,
    /// Body orientation; only ever rotated about +Y.
    pub orientation: Quat,
    /// Vertical speed in m/s, positive up.
    pub vertical_velocity: f32,
    /// Smoothed planar velocity in m/s (y is always zero).
    pub horizontal_velocity: Vec3,
    /// Ground support at the end of the last tick.
    pub is_grounded: bool,
    /// Set by a grounded jump, cleared on the next landing.
    pub is_jumping: bool,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl KinematicState {
    /// Airborne, motionless state at `position` facing +Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            vertical_velocity: 0.0,
            horizontal_velocity: Vec3::ZERO,
            is_grounded: false,
            is_jumping: false,
        }
    }

    /// Motionless state at `position` with grounded status taken from `probe`.
    pub fn spawn<G: GroundProbe + ?Sized>(position: Vec3, probe: &G) -> Self {
        Self {
            is_grounded: probe.is_grounded(position),
            ..Self::at(position)
        }
    }

    /// Planar speed in m/s.
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity.length()
    }

    /// Unit vector the body faces.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Body yaw in radians.
    pub fn yaw(&self) -> f32 {
        let f = self.forward();
        f.x.atan2(f.z)
    }
}
