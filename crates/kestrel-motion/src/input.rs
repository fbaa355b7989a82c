//! Per-tick input samples and the single-slot buffer that hands them to the
//! fixed tick exactly once.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Intent captured for one fixed tick.
///
/// `move_direction` is `(right, forward)` in the look-yaw frame, `look_rotation`
/// is `(pitch, yaw)` in radians. Pitch is positive when looking up; yaw turns
/// about +Y with yaw 0 facing +Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Planar movement intent; magnitudes above 1 are clamped.
    pub move_direction: Vec2,
    /// Look orientation as `(pitch, yaw)` in radians.
    pub look_rotation: Vec2,
    /// Jump requested this tick.
    pub jump: bool,
    /// Sprint held.
    pub sprint: bool,
    /// Aim held.
    pub aim: bool,
    /// Fire requested this tick.
    pub fire: bool,
}

impl InputSample {
    /// The "no intent" sample: zero vectors, all flags false.
    pub const NEUTRAL: Self = Self {
        move_direction: Vec2::ZERO,
        look_rotation: Vec2::ZERO,
        jump: false,
        sprint: false,
        aim: false,
        fire: false,
    };

    /// A neutral sample that keeps looking where the character last looked.
    pub fn neutral_looking(look_rotation: Vec2) -> Self {
        Self {
            look_rotation,
            ..Self::NEUTRAL
        }
        .sanitized()
    }

    /// Replace non-finite vectors with zero and clamp the move vector to unit length.
    ///
    /// Malformed input never faults; it degrades to no intent on that axis.
    pub fn sanitized(self) -> Self {
        let finite_or_zero = |v: Vec2| if v.is_finite() { v } else { Vec2::ZERO };
        Self {
            move_direction: finite_or_zero(self.move_direction).clamp_length_max(1.0),
            look_rotation: finite_or_zero(self.look_rotation),
            ..self
        }
    }

    /// Look pitch in radians.
    pub fn look_pitch(&self) -> f32 {
        self.look_rotation.x
    }

    /// Look yaw in radians.
    pub fn look_yaw(&self) -> f32 {
        self.look_rotation.y
    }

    /// True when the move vector is exactly zero.
    pub fn is_idle(&self) -> bool {
        self.move_direction == Vec2::ZERO
    }
}

/// Unit direction for a `(pitch, yaw)` look rotation.
pub fn look_direction(look_rotation: Vec2) -> Vec3 {
    let (pitch, yaw) = (look_rotation.x, look_rotation.y);
    Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
}

/// Holds the input for the next fixed tick.
///
/// The presentation loop may [`submit`](Self::submit) several samples between
/// two ticks. Continuous axes and held buttons take the latest value; the
/// one-shot `jump` and `fire` flags are latched until the tick consumes them,
/// so a press seen by one frame is never lost to the next.
#[derive(Debug, Clone, Default)]
pub struct InputSlot {
    pending: Option<InputSample>,
    last_look: Vec2,
}

impl InputSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a sample for the next tick, merging with any unconsumed one.
    pub fn submit(&mut self, sample: InputSample) {
        let sample = sample.sanitized();
        self.last_look = sample.look_rotation;
        self.pending = Some(match self.pending {
            Some(prev) => InputSample {
                jump: prev.jump || sample.jump,
                fire: prev.fire || sample.fire,
                ..sample
            },
            None => sample,
        });
    }

    /// Consumes the pending sample, leaving the slot empty.
    ///
    /// An empty slot yields a neutral sample that holds the last look rotation
    /// rather than the all-zero [`InputSample::NEUTRAL`], so a dropped frame
    /// never snaps the replicated look back to the origin.
    pub fn take(&mut self) -> InputSample {
        let sample = self.peek();
        self.pending = None;
        sample
    }

    /// The sample [`take`](Self::take) would return, without consuming it.
    pub fn peek(&self) -> InputSample {
        self.pending
            .unwrap_or_else(|| InputSample::neutral_looking(self.last_look))
    }

    /// The freshest look rotation submitted, consumed or not.
    pub fn latest_look(&self) -> Vec2 {
        self.last_look
    }

    /// True when a sample is waiting for the next tick.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
