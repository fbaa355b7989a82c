//! Per-frame presentation outputs.

use glam::{Vec2, Vec3};
use kestrel_config::Config;

/// Animation inputs for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationParams {
    /// Displayed horizontal speed as a fraction of sprint speed, in `[0, 1]`.
    pub speed: f32,
    pub grounded: bool,
    pub jump: bool,
    /// Falling faster than the free-fall threshold.
    pub free_fall: bool,
    pub aiming: bool,
}

/// Where the camera rig should sit and look.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraTarget {
    /// Pivot position in world space.
    pub position: Vec3,
    /// Look orientation as `(pitch, yaw)`.
    pub look_rotation: Vec2,
}

impl CameraTarget {
    /// Pivot `height` meters above a character at `position`.
    pub fn follow(position: Vec3, look_rotation: Vec2, height: f32) -> Self {
        Self {
            position: position + Vec3::Y * height,
            look_rotation,
        }
    }
}

/// Everything one presentation frame produced, returned for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationFrame {
    /// Tick of the snapshot that was presented.
    pub tick: u64,
    pub animation: AnimationParams,
    /// Fire effects triggered this frame.
    pub fire_effects: u32,
    pub camera: CameraTarget,
}

/// Tuning for the presentation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationSettings {
    /// Rate at which displayed speed follows simulated speed.
    pub speed_smoothing: f32,
    /// Vertical velocity below which the character is free-falling.
    pub free_fall_threshold: f32,
    /// Speed that maps to a normalized speed of 1.
    pub sprint_speed: f32,
    /// Camera pivot height.
    pub camera_height: f32,
}

impl PresentationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            speed_smoothing: config.presentation.speed_smoothing,
            free_fall_threshold: config.presentation.free_fall_threshold,
            sprint_speed: config.movement.sprint_speed,
            camera_height: config.presentation.camera_height,
        }
    }

    /// Maps a speed in m/s onto `[0, 1]`.
    pub fn normalized_speed(&self, speed: f32) -> f32 {
        if self.sprint_speed <= 0.0 || !speed.is_finite() {
            return 0.0;
        }
        (speed / self.sprint_speed).clamp(0.0, 1.0)
    }
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
