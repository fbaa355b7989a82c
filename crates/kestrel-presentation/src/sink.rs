//! Where presentation outputs go.

use kestrel_motion::HitRecord;

use crate::frame::{AnimationParams, CameraTarget};

/// Receiver for presentation outputs, injected by the host (renderer, audio,
/// or a recorder in headless runs).
pub trait PresentationSink {
    /// Updates animation inputs for this frame.
    fn set_animation(&mut self, params: &AnimationParams);

    /// Plays `count` one-shot fire effects. `last_hit` is the newest hit, if
    /// the newest shot hit anything.
    fn play_fire_effects(&mut self, count: u32, last_hit: Option<&HitRecord>);

    /// Moves the camera rig.
    fn place_camera(&mut self, target: &CameraTarget);
}

/// Sink that stores everything it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub animations: Vec<AnimationParams>,
    pub fire_effects: Vec<(u32, Option<HitRecord>)>,
    pub cameras: Vec<CameraTarget>,
}

impl RecordingSink {
    /// Sum of all effect counts played.
    pub fn total_fire_effects(&self) -> u32 {
        self.fire_effects.iter().map(|(count, _)| count).sum()
    }
}

impl PresentationSink for RecordingSink {
    fn set_animation(&mut self, params: &AnimationParams) {
        self.animations.push(*params);
    }

    fn play_fire_effects(&mut self, count: u32, last_hit: Option<&HitRecord>) {
        self.fire_effects.push((count, last_hit.copied()));
    }

    fn place_camera(&mut self, target: &CameraTarget) {
        self.cameras.push(*target);
    }
}
