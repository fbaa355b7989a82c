//! Variable-rate presentation of replicated characters.
//!
//! Presentation never mutates simulation state. Each frame it reads the
//! latest committed [`CharacterSnapshot`](kestrel_replication::CharacterSnapshot),
//! derives animation parameters and a camera target, and turns the
//! monotonic fire counter into a number of one-shot effects to play.

pub mod frame;
pub mod reconciler;
pub mod sink;

pub use frame::{AnimationParams, CameraTarget, PresentationFrame, PresentationSettings};
pub use reconciler::{EffectReconciler, PresentationState};
pub use sink::{PresentationSink, RecordingSink};

use glam::Vec2;
use kestrel_motion::blend_factor;
use kestrel_replication::CharacterSnapshot;
use tracing::trace;

/// Runs one presentation frame for one character.
///
/// `look_rotation` is the look used for the camera: the freshest local input
/// on the authority, the replicated value everywhere else.
pub fn present<S: PresentationSink + ?Sized>(
    state: &mut PresentationState,
    snapshot: &CharacterSnapshot,
    look_rotation: Vec2,
    frame_dt: f32,
    settings: &PresentationSettings,
    sink: &mut S,
) -> PresentationFrame {
    let kinematic = &snapshot.kinematic;
    let properties = &snapshot.properties;

    let target_speed = kinematic.horizontal_speed();
    let t = blend_factor(settings.speed_smoothing, frame_dt.max(0.0));
    state.smoothed_speed += (target_speed - state.smoothed_speed) * t;

    let animation = AnimationParams {
        speed: settings.normalized_speed(state.smoothed_speed),
        grounded: kinematic.is_grounded,
        jump: kinematic.is_jumping,
        free_fall: kinematic.vertical_velocity < settings.free_fall_threshold,
        aiming: properties.is_aiming,
    };
    sink.set_animation(&animation);

    let fire_effects = state.fire.reconcile(properties.fire_count);
    if fire_effects > 0 {
        // Only the newest hit survives replication; every effect this frame uses it.
        sink.play_fire_effects(fire_effects, properties.last_hit.as_ref());
    }

    let camera = CameraTarget::follow(kinematic.position, look_rotation, settings.camera_height);
    sink.place_camera(&camera);

    trace!(
        tick = snapshot.tick,
        speed = animation.speed,
        fire_effects,
        "presented"
    );

    PresentationFrame {
        tick: snapshot.tick,
        animation,
        fire_effects,
        camera,
    }
}
