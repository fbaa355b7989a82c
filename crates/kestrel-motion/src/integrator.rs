//! The fixed-tick motion integrator.
//!
//! [`advance`] is a pure function of its arguments: the same state, input, dt,
//! params, and probe answers always produce the same bits. Anything layered on
//! top (prediction, resimulation, replay checks) relies on that.

use glam::{Quat, Vec3};
use tracing::{debug, trace};

use crate::input::InputSample;
use crate::params::MotionParams;
use crate::probe::GroundProbe;
use crate::state::KinematicState;

/// Projected velocities shorter than this are not rescaled.
const SLOPE_EPS: f32 = 1.0e-6;

/// Reasons the integrator refuses to advance.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MotionError {
    /// The tick duration was negative, NaN, or infinite.
    #[error("invalid tick duration {0}")]
    InvalidDeltaTime(f32),
}

/// Fraction of the remaining gap closed by an exponential approach at `rate`
/// over `dt` seconds. Always in `[0, 1)`.
#[inline]
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

/// Yaw-only rotation facing planar `direction`.
#[inline]
fn facing(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

/// Advances `state` by one fixed tick.
///
/// Steps, in order: vertical velocity (jump impulse, asymmetric gravity),
/// desired planar velocity in the look-yaw frame, orientation, velocity blend,
/// ground-slope projection, and finally displacement through `probe`.
///
/// # Errors
///
/// Returns [`MotionError::InvalidDeltaTime`] for a negative or non-finite
/// `dt`. The state is left untouched.
pub fn advance<G: GroundProbe + ?Sized>(
    state: &KinematicState,
    input: &InputSample,
    dt: f32,
    params: &MotionParams,
    probe: &G,
) -> Result<KinematicState, MotionError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(MotionError::InvalidDeltaTime(dt));
    }
    let input = input.sanitized();
    let mut next = *state;

    // Vertical: a jump only starts from the ground.
    let jumped = state.is_grounded && input.jump;
    let mut vertical = if jumped {
        params.jump_impulse
    } else if state.is_grounded {
        0.0
    } else {
        state.vertical_velocity
    };
    if jumped || !state.is_grounded {
        vertical -= params.gravity(vertical) * dt;
    }

    // Desired planar velocity in the look-yaw frame.
    let look_frame = Quat::from_rotation_y(input.look_yaw());
    let move_dir = look_frame * Vec3::new(input.move_direction.x, 0.0, input.move_direction.y);
    let desired = move_dir * params.speed(input.sprint);
    let decelerating = desired == Vec3::ZERO;

    // Orientation: aim faces the look yaw, otherwise face travel; idle holds.
    let turn = if input.aim {
        Some((look_frame, params.aim_rotation_speed))
    } else if !decelerating {
        Some((facing(desired), params.rotation_speed))
    } else {
        None
    };
    if let Some((target, rate)) = turn {
        next.orientation = state
            .orientation
            .slerp(target, blend_factor(rate, dt))
            .normalize();
    }

    // Blend toward the desired velocity. Deceleration depends only on intent.
    let rate = params.blend_rate(state.is_grounded, decelerating);
    let horizontal = state
        .horizontal_velocity
        .lerp(desired, blend_factor(rate, dt));

    // Keep planar speed when walking on a slope.
    let mut move_velocity = horizontal;
    if state.is_grounded
        && let Some(projected) = probe.project_on_ground(state.position, horizontal)
    {
        let len = projected.length();
        if len > SLOPE_EPS {
            move_velocity = projected * (horizontal.length() / len);
        }
    }

    let contact = probe.move_character(state.position, move_velocity + Vec3::Y * vertical, dt);
    next.position = contact.position;
    next.is_grounded = contact.grounded;
    next.horizontal_velocity = horizontal;

    if jumped {
        next.is_jumping = true;
        debug!(position = ?state.position, vertical, "jump");
    } else if contact.grounded {
        if !state.is_grounded {
            debug!(position = ?contact.position, was_jumping = state.is_jumping, "landed");
        }
        next.is_jumping = false;
        vertical = vertical.max(0.0);
    }
    next.vertical_velocity = vertical;

    trace!(
        position = ?next.position,
        speed = horizontal.length(),
        vertical,
        grounded = next.is_grounded,
        jumping = next.is_jumping,
        "advance"
    );

    Ok(next)
}
