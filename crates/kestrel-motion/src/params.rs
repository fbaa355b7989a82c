use kestrel_config::MovementConfig;

/// Tuning constants read by [`advance`](crate::advance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Horizontal speed without sprint (m/s).
    pub walk_speed: f32,
    /// Horizontal speed with sprint (m/s).
    pub sprint_speed: f32,
    /// Turn rate toward the movement direction (1/s).
    pub rotation_speed: f32,
    /// Turn rate toward the look yaw while aiming (1/s).
    pub aim_rotation_speed: f32,
    /// Gravity magnitude while rising or resting (m/s²).
    pub up_gravity: f32,
    /// Gravity magnitude while falling (m/s²).
    pub down_gravity: f32,
    /// Upward velocity set by a jump (m/s).
    pub jump_impulse: f32,
    /// Ground blend rate with intent (1/s).
    pub ground_acceleration: f32,
    /// Ground blend rate without intent (1/s).
    pub ground_deceleration: f32,
    /// Air blend rate with intent (1/s).
    pub air_acceleration: f32,
    /// Air blend rate without intent (1/s).
    pub air_deceleration: f32,
}

impl MotionParams {
    /// Builds params from the movement section of the config.
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            rotation_speed: config.rotation_speed,
            aim_rotation_speed: config.aim_rotation_speed,
            up_gravity: config.up_gravity,
            down_gravity: config.down_gravity,
            jump_impulse: config.jump_impulse,
            ground_acceleration: config.ground_acceleration,
            ground_deceleration: config.ground_deceleration,
            air_acceleration: config.air_acceleration,
            air_deceleration: config.air_deceleration,
        }
    }

    /// Target horizontal speed for the sprint flag.
    pub fn speed(&self, sprint: bool) -> f32 {
        if sprint {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Gravity magnitude for the current vertical velocity.
    pub fn gravity(&self, vertical_velocity: f32) -> f32 {
        if vertical_velocity >= 0.0 {
            self.up_gravity
        } else {
            self.down_gravity
        }
    }

    /// One of the four velocity blend rates.
    pub fn blend_rate(&self, grounded: bool, decelerating: bool) -> f32 {
        match (grounded, decelerating) {
            (true, false) => self.ground_acceleration,
            (true, true) => self.ground_deceleration,
            (false, false) => self.air_acceleration,
            (false, true) => self.air_deceleration,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}
