//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Character movement tuning.
    pub movement: MovementConfig,
    /// Fire / hit-probe settings.
    pub fire: FireConfig,
    /// Fixed simulation tick settings.
    pub tick: TickConfig,
    /// Presentation-side blending settings.
    pub presentation: PresentationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Character movement tuning. Speeds in m/s, rates in 1/s, gravity as a
/// positive magnitude in m/s².
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed without sprint.
    pub walk_speed: f32,
    /// Horizontal speed while sprinting.
    pub sprint_speed: f32,
    /// Rate at which the body turns toward the movement direction.
    pub rotation_speed: f32,
    /// Rate at which the body turns toward the look yaw while aiming.
    pub aim_rotation_speed: f32,
    /// Gravity applied while vertical velocity is zero or rising.
    pub up_gravity: f32,
    /// Gravity applied while falling.
    pub down_gravity: f32,
    /// Instant upward velocity applied by a grounded jump.
    pub jump_impulse: f32,
    /// Velocity blend rate on the ground with movement intent.
    pub ground_acceleration: f32,
    /// Velocity blend rate on the ground without movement intent.
    pub ground_deceleration: f32,
    /// Velocity blend rate in the air with movement intent.
    pub air_acceleration: f32,
    /// Velocity blend rate in the air without movement intent.
    pub air_deceleration: f32,
}

/// Fire and hit-probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FireConfig {
    /// Maximum ray length in meters.
    pub max_range: f32,
    /// Bitmask of collision layers a shot may hit.
    pub target_mask: u32,
    /// Height of the aim origin above the character position, in meters.
    pub aim_origin_height: f32,
}

/// Fixed tick configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TickConfig {
    /// Fixed simulation rate in Hz.
    pub tick_rate_hz: u32,
    /// Longest frame time (seconds) fed into the accumulator in one frame.
    pub max_frame_time: f64,
}

/// Presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresentationConfig {
    /// Rate at which the displayed speed follows the simulated speed.
    pub speed_smoothing: f32,
    /// Vertical velocity below which the character counts as free-falling.
    pub free_fall_threshold: f32,
    /// Camera pivot height above the character position.
    pub camera_height: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            sprint_speed: 5.0,
            rotation_speed: 8.0,
            aim_rotation_speed: 15.0,
            up_gravity: 15.0,
            down_gravity: 25.0,
            jump_impulse: 6.0,
            ground_acceleration: 55.0,
            ground_deceleration: 25.0,
            air_acceleration: 25.0,
            air_deceleration: 1.3,
        }
    }
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            max_range: 100.0,
            target_mask: u32::MAX,
            aim_origin_height: 1.6,
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_frame_time: 0.25,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            speed_smoothing: 10.0,
            free_fall_threshold: -10.0,
            camera_height: 1.7,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TickConfig {
    /// Duration of one fixed tick in seconds. A zero rate is treated as 1 Hz.
    pub fn tick_duration_secs(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz.max(1))
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for Kestrel, if the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kestrel"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join("config.ron");
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let new_config = read_config(&config_path)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("walk_speed: 2.0"));
        assert!(ron_str.contains("tick_rate_hz: 60"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(movement: (walk_speed: 3.0), tick: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.movement.walk_speed, 3.0);
        assert_eq!(config.movement.sprint_speed, 5.0);
        assert_eq!(config.fire, FireConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_fall_is_faster_than_rise_by_default() {
        let m = MovementConfig::default();
        assert!(m.down_gravity > m.up_gravity);
        assert!(m.sprint_speed > m.walk_speed);
    }

    #[test]
    fn test_tick_duration_guards_zero_rate() {
        let tick = TickConfig {
            tick_rate_hz: 0,
            ..TickConfig::default()
        };
        assert_eq!(tick.tick_duration_secs(), 1.0);
        assert!((TickConfig::default().tick_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.movement.walk_speed = 3.5;
        config.tick.tick_rate_hz = 30;
        config.fire.target_mask = 0b101;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.movement.jump_impulse = 9.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.movement.jump_impulse), Some(9.0));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_reload_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => assert_eq!(path, dir.path().join("config.ron")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_tick_rate_is_one_hertz() {
        let tick = TickConfig {
            tick_rate_hz: 0,
            ..TickConfig::default()
        };
        assert_eq!(tick.tick_duration_secs(), 1.0);
        assert!((TickConfig::default().tick_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    }
}
