//! Networked per-character properties and the authority-side store that
//! mutates them once per fixed tick.

use glam::{Vec2, Vec3};
use kestrel_config::FireConfig;
use kestrel_motion::{HitProbe, HitRecord, InputSample, TargetMask, look_direction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Values every observer needs to present a character it does not control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeProperties {
    /// Aim held on the last tick.
    pub is_aiming: bool,
    /// Look orientation as `(pitch, yaw)` in radians.
    pub look_rotation: Vec2,
    /// Number of fire attempts so far. Never decreases.
    pub fire_count: u32,
    /// Result of the most recent fire attempt; `None` means it missed.
    pub last_hit: Option<HitRecord>,
}

/// Fire settings used by [`PropertyStore::apply_tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParams {
    /// Ray length in meters.
    pub max_range: f32,
    /// Layers a shot may hit.
    pub mask: TargetMask,
    /// Aim origin height above the character position.
    pub aim_origin_height: f32,
}

impl FireParams {
    /// Builds fire params from the config section.
    pub fn from_config(config: &FireConfig) -> Self {
        Self {
            max_range: config.max_range,
            mask: TargetMask(config.target_mask),
            aim_origin_height: config.aim_origin_height,
        }
    }

    /// Ray origin for a character standing at `position`.
    pub fn aim_origin(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.aim_origin_height
    }
}

impl Default for FireParams {
    fn default() -> Self {
        Self::from_config(&FireConfig::default())
    }
}

/// Outcome of one fire attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireAttempt {
    /// `fire_count` after this attempt.
    pub count: u32,
    /// What the shot hit, if anything.
    pub hit: Option<HitRecord>,
}

/// Single-writer holder of [`AuthoritativeProperties`].
///
/// Only the authority constructs one; everybody else sees the properties
/// through snapshots.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    properties: AuthoritativeProperties,
}

impl PropertyStore {
    /// Creates a store with default properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from previously published properties.
    pub fn from_properties(properties: AuthoritativeProperties) -> Self {
        Self { properties }
    }

    /// Read-only view of the current properties.
    pub fn properties(&self) -> &AuthoritativeProperties {
        &self.properties
    }

    /// Applies one tick of input after motion has been integrated.
    ///
    /// Aim and look are copied from `input`. A fire intent clears `last_hit`,
    /// casts from `aim_origin` along the look direction, records any hit, and
    /// then bumps `fire_count` whether or not something was hit.
    pub fn apply_tick<H: HitProbe + ?Sized>(
        &mut self,
        input: &InputSample,
        aim_origin: Vec3,
        fire: &FireParams,
        probe: &H,
    ) -> Option<FireAttempt> {
        let input = input.sanitized();
        self.properties.is_aiming = input.aim;
        self.properties.look_rotation = input.look_rotation;

        if !input.fire {
            return None;
        }

        self.properties.last_hit = None;
        let direction = look_direction(input.look_rotation);
        let hit = probe.raycast(aim_origin, direction, fire.max_range, fire.mask);
        self.properties.last_hit = hit;
        self.properties.fire_count = self.properties.fire_count.saturating_add(1);

        debug!(
            count = self.properties.fire_count,
            hit = hit.is_some(),
            "fire"
        );

        Some(FireAttempt {
            count: self.properties.fire_count,
            hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_motion::{NoHits, PlaneGround};

    fn wall_ahead() -> PlaneGround {
        PlaneGround {
            origin: Vec3::new(0.0, 0.0, 10.0),
            normal: Vec3::new(0.0, 0.0, -1.0),
            layers: 1,
        }
    }

    fn fire() -> InputSample {
        InputSample {
            fire: true,
            ..InputSample::NEUTRAL
        }
    }

    #[test]
    fn test_fire_counts_attempts_not_hits() {
        let mut store = PropertyStore::new();
        let params = FireParams::default();
        let origin = params.aim_origin(Vec3::ZERO);

        let miss = store.apply_tick(&fire(), origin, &params, &NoHits).unwrap();
        assert_eq!(miss.count, 1);
        assert!(miss.hit.is_none());

        let hit = store.apply_tick(&fire(), origin, &params, &wall_ahead()).unwrap();
        assert_eq!(hit.count, 2);
        let record = hit.hit.unwrap();
        assert!((record.point.z - 10.0).abs() < 1e-5);
        assert!((record.point.y - params.aim_origin_height).abs() < 1e-5);
        assert_eq!(store.properties().last_hit, Some(record));
    }

    #[test]
    fn test_miss_resets_previous_hit() {
        let mut store = PropertyStore::new();
        let params = FireParams::default();
        let origin = params.aim_origin(Vec3::ZERO);

        store.apply_tick(&fire(), origin, &params, &wall_ahead());
        assert!(store.properties().last_hit.is_some());

        store.apply_tick(&fire(), origin, &params, &NoHits);
        assert_eq!(store.properties().last_hit, None);
        assert_eq!(store.properties().fire_count, 2);
    }

    #[test]
    fn test_masked_target_is_a_miss() {
        let mut store = PropertyStore::new();
        let params = FireParams {
            mask: TargetMask(0b100),
            ..FireParams::default()
        };
        let attempt = store
            .apply_tick(&fire(), params.aim_origin(Vec3::ZERO), &params, &wall_ahead())
            .unwrap();
        assert!(attempt.hit.is_none());
        assert_eq!(attempt.count, 1);
    }

    #[test]
    fn test_no_fire_keeps_hit_and_count() {
        let mut store = PropertyStore::new();
        let params = FireParams::default();
        let origin = params.aim_origin(Vec3::ZERO);
        store.apply_tick(&fire(), origin, &params, &wall_ahead());
        let before = *store.properties();

        let aim = InputSample {
            aim: true,
            look_rotation: Vec2::new(0.2, -0.4),
            ..InputSample::NEUTRAL
        };
        assert!(store.apply_tick(&aim, origin, &params, &NoHits).is_none());

        let after = store.properties();
        assert_eq!(after.fire_count, before.fire_count);
        assert_eq!(after.last_hit, before.last_hit);
        assert!(after.is_aiming);
        assert_eq!(after.look_rotation, Vec2::new(0.2, -0.4));
    }

    #[test]
    fn test_fire_count_never_decreases() {
        let mut store = PropertyStore::from_properties(AuthoritativeProperties {
            fire_count: u32::MAX - 1,
            ..AuthoritativeProperties::default()
        });
        let params = FireParams::default();
        let mut prev = store.properties().fire_count;

        for i in 0..6 {
            let input = InputSample {
                fire: i % 2 == 0,
                ..InputSample::NEUTRAL
            };
            store.apply_tick(&input, Vec3::ZERO, &params, &NoHits);
            let count = store.properties().fire_count;
            assert!(count >= prev);
            prev = count;
        }
        assert_eq!(prev, u32::MAX);
    }
}
