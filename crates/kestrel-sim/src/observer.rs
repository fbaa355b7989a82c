//! A participant that presents a character simulated elsewhere.

use kestrel_config::Config;
use kestrel_presentation::{
    PresentationFrame, PresentationSettings, PresentationSink, PresentationState, present,
};
use kestrel_replication::{CharacterSnapshot, ReplicaBuffer};
use tracing::trace;

use crate::SimError;
use crate::role::CharacterRole;

/// Observer role: receives snapshots at any time, commits the newest one at
/// its fixed-tick boundary, and presents only committed data.
pub struct Observer {
    replica: ReplicaBuffer,
    settings: PresentationSettings,
    presentation: PresentationState,
}

impl Observer {
    /// Begins observing from the snapshot that made the character visible.
    ///
    /// Fire events that happened before `initial` are never played.
    pub fn new(initial: CharacterSnapshot, config: &Config) -> Self {
        Self {
            replica: ReplicaBuffer::new(initial),
            settings: PresentationSettings::from_config(config),
            presentation: PresentationState::new(initial.properties.fire_count),
        }
    }

    /// Accepts a decoded snapshot from the transport.
    pub fn receive(&mut self, snapshot: CharacterSnapshot) -> Result<(), SimError> {
        Ok(self.replica.receive(snapshot)?)
    }

    /// Accepts a wire-format snapshot from the transport.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        Ok(self.replica.receive_bytes(bytes)?)
    }

    pub fn presentation_state(&self) -> &PresentationState {
        &self.presentation
    }
}

impl CharacterRole for Observer {
    fn fixed_update(&mut self, _dt: f32) -> Result<(), SimError> {
        if self.replica.commit() {
            trace!(tick = self.replica.committed().tick, "snapshot committed");
        }
        Ok(())
    }

    fn present(&mut self, frame_dt: f32, sink: &mut dyn PresentationSink) -> PresentationFrame {
        let snapshot = *self.replica.committed();
        present(
            &mut self.presentation,
            &snapshot,
            snapshot.properties.look_rotation,
            frame_dt,
            &self.settings,
            sink,
        )
    }

    fn latest(&self) -> &CharacterSnapshot {
        self.replica.committed()
    }

    fn is_authority(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use kestrel_motion::KinematicState;
    use kestrel_presentation::RecordingSink;
    use kestrel_replication::{AuthoritativeProperties, ReplicationError};

    fn snapshot(tick: u64, fire_count: u32) -> CharacterSnapshot {
        CharacterSnapshot {
            tick,
            kinematic: KinematicState::at(Vec3::new(0.0, 0.0, tick as f32)),
            properties: AuthoritativeProperties {
                fire_count,
                look_rotation: Vec2::new(0.1, tick as f32 * 0.01),
                ..AuthoritativeProperties::default()
            },
        }
    }

    #[test]
    fn test_presents_only_committed_snapshots() {
        let mut observer = Observer::new(snapshot(1, 0), &Config::default());
        let mut sink = RecordingSink::default();

        observer.receive(snapshot(2, 1)).unwrap();
        let before = observer.present(0.01, &mut sink);
        assert_eq!(before.tick, 1);
        assert_eq!(before.fire_effects, 0);

        observer.fixed_update(1.0 / 60.0).unwrap();
        let after = observer.present(0.01, &mut sink);
        assert_eq!(after.tick, 2);
        assert_eq!(after.fire_effects, 1);
        assert!(!observer.is_authority());
    }

    #[test]
    fn test_camera_uses_replicated_look() {
        let initial = snapshot(5, 0);
        let mut observer = Observer::new(initial, &Config::default());
        let mut sink = RecordingSink::default();
        let frame = observer.present(0.01, &mut sink);
        assert_eq!(frame.camera.look_rotation, initial.properties.look_rotation);
    }

    #[test]
    fn test_late_join_skips_earlier_fires() {
        let mut observer = Observer::new(snapshot(50, 9), &Config::default());
        assert_eq!(observer.presentation_state().last_observed_fire_count(), 9);
        let mut sink = RecordingSink::default();
        observer.present(0.01, &mut sink);
        assert_eq!(sink.total_fire_effects(), 0);
    }

    #[test]
    fn test_stale_bytes_surface_as_errors() {
        let mut observer = Observer::new(snapshot(3, 0), &Config::default());
        let bytes = snapshot(3, 0).encode().unwrap();
        let err = observer.receive_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            SimError::Replication(ReplicationError::StaleSnapshot { received: 3, latest: 3 })
        ));
        assert_eq!(observer.latest().tick, 3);
    }
}
