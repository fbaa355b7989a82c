//! The participant that simulates a character.

use glam::{Vec2, Vec3};
use kestrel_config::Config;
use kestrel_motion::{
    GroundProbe, HitProbe, InputSample, InputSlot, KinematicState, MotionParams, advance,
};
use kestrel_presentation::{
    PresentationFrame, PresentationSettings, PresentationSink, PresentationState, present,
};
use kestrel_replication::{
    AuthoritativeProperties, CharacterSnapshot, FireParams, PropertyStore,
};
use tracing::{debug, info};

use crate::SimError;
use crate::outbox::SnapshotOutbox;
use crate::role::CharacterRole;

/// Authority role: owns the kinematic state and the property store, consumes
/// input once per tick, and publishes a snapshot per tick.
pub struct Authority<G, H> {
    ground: G,
    hits: H,
    params: MotionParams,
    fire: FireParams,
    settings: PresentationSettings,
    input: InputSlot,
    state: KinematicState,
    store: PropertyStore,
    latest: CharacterSnapshot,
    outbox: SnapshotOutbox,
    presentation: PresentationState,
}

impl<G: GroundProbe, H: HitProbe> Authority<G, H> {
    /// Spawns a motionless character at `position`.
    pub fn new(position: Vec3, ground: G, hits: H, config: &Config) -> Self {
        let state = KinematicState::spawn(position, &ground);
        let store = PropertyStore::new();
        let latest = CharacterSnapshot {
            tick: 0,
            kinematic: state,
            properties: *store.properties(),
        };
        info!(?position, grounded = state.is_grounded, "authority spawned");

        Self {
            ground,
            hits,
            params: MotionParams::from_config(&config.movement),
            fire: FireParams::from_config(&config.fire),
            settings: PresentationSettings::from_config(config),
            input: InputSlot::new(),
            state,
            store,
            latest,
            outbox: SnapshotOutbox::new(),
            presentation: PresentationState::new(0),
        }
    }

    /// Queues input for the next tick. May be called any number of times
    /// between ticks.
    pub fn submit_input(&mut self, sample: InputSample) {
        self.input.submit(sample);
    }

    /// Freshest look rotation from local input, consumed or not.
    pub fn local_look(&self) -> Vec2 {
        self.input.latest_look()
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn properties(&self) -> &AuthoritativeProperties {
        self.store.properties()
    }

    /// Number of ticks simulated.
    pub fn tick(&self) -> u64 {
        self.latest.tick
    }

    pub fn outbox_mut(&mut self) -> &mut SnapshotOutbox {
        &mut self.outbox
    }

    /// Replaces movement tuning, e.g. after a config reload.
    pub fn apply_config(&mut self, config: &Config) {
        self.params = MotionParams::from_config(&config.movement);
        self.fire = FireParams::from_config(&config.fire);
        self.settings = PresentationSettings::from_config(config);
        debug!("authority tuning reloaded");
    }
}

impl<G: GroundProbe, H: HitProbe> CharacterRole for Authority<G, H> {
    /// Nothing is committed unless the whole tick succeeds: on error the
    /// pending input stays queued for the next tick and no state changes.
    fn fixed_update(&mut self, dt: f32) -> Result<(), SimError> {
        let input = self.input.peek();
        let next = advance(&self.state, &input, dt, &self.params, &self.ground)?;

        let mut store = self.store.clone();
        let aim_origin = self.fire.aim_origin(next.position);
        let attempt = store.apply_tick(&input, aim_origin, &self.fire, &self.hits);

        let snapshot = CharacterSnapshot {
            tick: self.latest.tick + 1,
            kinematic: next,
            properties: *store.properties(),
        };
        self.outbox.publish(&snapshot)?;

        if let Some(attempt) = attempt {
            debug!(count = attempt.count, hit = attempt.hit.is_some(), "fire resolved");
        }
        self.input.take();
        self.state = next;
        self.store = store;
        self.latest = snapshot;
        Ok(())
    }

    fn present(&mut self, frame_dt: f32, sink: &mut dyn PresentationSink) -> PresentationFrame {
        // Own camera follows local input, not the last tick.
        let look = self.local_look();
        present(
            &mut self.presentation,
            &self.latest,
            look,
            frame_dt,
            &self.settings,
            sink,
        )
    }

    fn latest(&self) -> &CharacterSnapshot {
        &self.latest
    }

    fn is_authority(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_motion::{NoHits, PlaneGround};
    use kestrel_presentation::RecordingSink;

    const DT: f32 = 1.0 / 60.0;

    fn authority_at(position: Vec3) -> Authority<PlaneGround, NoHits> {
        Authority::new(position, PlaneGround::flat(0.0), NoHits, &Config::default())
    }

    #[test]
    fn test_ticks_without_input_still_fall() {
        let mut authority = authority_at(Vec3::new(0.0, 5.0, 0.0));
        assert!(!authority.state().is_grounded);

        for _ in 0..10 {
            authority.fixed_update(DT).unwrap();
        }
        assert!(authority.state().position.y < 5.0);
        assert!(authority.state().vertical_velocity < 0.0);
        assert_eq!(authority.tick(), 10);
        assert_eq!(authority.outbox_mut().len(), 10);
    }

    #[test]
    fn test_ticks_without_input_decelerate() {
        let mut authority = authority_at(Vec3::ZERO);
        for _ in 0..30 {
            authority.submit_input(InputSample {
                move_direction: Vec2::new(0.0, 1.0),
                ..InputSample::NEUTRAL
            });
            authority.fixed_update(DT).unwrap();
        }
        let mut prev = authority.state().horizontal_speed();
        assert!(prev > 1.0);

        for _ in 0..60 {
            authority.fixed_update(DT).unwrap();
            let speed = authority.state().horizontal_speed();
            assert!(speed <= prev);
            assert!(authority.state().horizontal_velocity.z >= 0.0);
            prev = speed;
        }
        assert!(prev < 0.1);
    }

    #[test]
    fn test_input_consumed_once_per_tick() {
        let mut authority = authority_at(Vec3::ZERO);
        authority.submit_input(InputSample {
            fire: true,
            ..InputSample::NEUTRAL
        });
        authority.fixed_update(DT).unwrap();
        authority.fixed_update(DT).unwrap();
        assert_eq!(authority.properties().fire_count, 1);
        assert_eq!(authority.latest().properties.fire_count, 1);
    }

    #[test]
    fn test_refused_tick_keeps_pending_presses() {
        let mut authority = authority_at(Vec3::ZERO);
        authority.submit_input(InputSample {
            fire: true,
            jump: true,
            ..InputSample::NEUTRAL
        });
        assert!(authority.fixed_update(f32::NAN).is_err());
        assert_eq!(authority.tick(), 0);
        assert_eq!(authority.properties().fire_count, 0);
        assert!(authority.outbox_mut().is_empty());

        authority.fixed_update(DT).unwrap();
        assert_eq!(authority.properties().fire_count, 1);
        assert!(authority.state().is_jumping);
        assert_eq!(authority.tick(), 1);

        authority.fixed_update(DT).unwrap();
        assert_eq!(authority.properties().fire_count, 1);
    }

    #[test]
    fn test_camera_uses_unconsumed_local_look() {
        let mut authority = authority_at(Vec3::ZERO);
        let look = Vec2::new(0.2, 1.0);
        authority.submit_input(InputSample::neutral_looking(look));

        let mut sink = RecordingSink::default();
        let frame = authority.present(DT, &mut sink);
        assert_eq!(frame.camera.look_rotation, look);
        assert_eq!(authority.local_look(), look);
        assert_eq!(authority.latest().properties.look_rotation, Vec2::ZERO);
        assert!(authority.is_authority());
    }

    #[test]
    fn test_snapshots_are_published_in_tick_order() {
        let mut authority = authority_at(Vec3::ZERO);
        for _ in 0..3 {
            authority.fixed_update(DT).unwrap();
        }
        let ticks: Vec<u64> = authority
            .outbox_mut()
            .drain()
            .map(|bytes| CharacterSnapshot::decode(&bytes).unwrap().tick)
            .collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }

    #[test]
    fn test_apply_config_changes_speed() {
        let mut authority = authority_at(Vec3::ZERO);
        let mut config = Config::default();
        config.movement.walk_speed = 4.0;
        authority.apply_config(&config);

        for _ in 0..240 {
            authority.submit_input(InputSample {
                move_direction: Vec2::new(0.0, 1.0),
                ..InputSample::NEUTRAL
            });
            authority.fixed_update(DT).unwrap();
        }
        let speed = authority.state().horizontal_speed();
        assert!(speed > 3.9 && speed <= 4.0 + 1e-4, "speed = {speed}");
    }
}
