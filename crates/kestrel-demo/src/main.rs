//! Headless demo: one authority and one observer of the same character.
//!
//! The authority renders at 144 Hz and the observer at 75 Hz while both run
//! the configured fixed tick rate. A scripted input timeline moves the
//! character around and fires at a target wall. Snapshots travel through the
//! wire codec and presentation output goes to the log.
//!
//! Run with `cargo run -p kestrel-demo`, or
//! `cargo run -p kestrel-demo -- --tick-rate 30 --log-level debug`.

use std::path::PathBuf;

use clap::Parser;
use glam::{Vec2, Vec3};
use kestrel_config::{CliArgs, Config};
use kestrel_motion::{HitRecord, InputSample};
use kestrel_physics::{CollisionWorld, RapierProbe};
use kestrel_presentation::{AnimationParams, CameraTarget, PresentationSink};
use kestrel_replication::ReplicationError;
use kestrel_sim::{Authority, CharacterRole, Observer, SimError, TickScheduler, step_frame};
use tracing::{debug, error, info, warn};

const AUTHORITY_FRAME_SECS: f64 = 1.0 / 144.0;
const OBSERVER_FRAME_SECS: f64 = 1.0 / 75.0;
const DURATION_SECS: f64 = 4.0;

const FLOOR_LAYER: u32 = 0b01;
const TARGET_LAYER: u32 = 0b10;

/// Sink that writes presentation output to the log.
struct LogSink {
    label: &'static str,
    effects_played: u32,
    last_animation: AnimationParams,
}

impl LogSink {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            effects_played: 0,
            last_animation: AnimationParams::default(),
        }
    }
}

impl PresentationSink for LogSink {
    fn set_animation(&mut self, params: &AnimationParams) {
        let previous = self.last_animation;
        if params.jump != previous.jump || params.grounded != previous.grounded {
            info!(
                who = self.label,
                grounded = params.grounded,
                jump = params.jump,
                "locomotion changed"
            );
        }
        self.last_animation = *params;
    }

    fn play_fire_effects(&mut self, count: u32, last_hit: Option<&HitRecord>) {
        self.effects_played += count;
        match last_hit {
            Some(hit) => {
                info!(who = self.label, count, point = ?hit.point, "muzzle flash with impact")
            }
            None => info!(who = self.label, count, "muzzle flash without impact"),
        }
    }

    fn place_camera(&mut self, target: &CameraTarget) {
        debug!(
            who = self.label,
            position = ?target.position,
            look = ?target.look_rotation,
            "camera"
        );
    }
}

/// Input the local player produces at time `t`.
fn scripted_input(t: f64) -> InputSample {
    let press = |at: f64| (t - at).abs() < AUTHORITY_FRAME_SECS / 2.0;
    let mut input = InputSample::NEUTRAL;

    if t < 1.0 {
        input.move_direction = Vec2::new(0.0, 1.0);
    } else if t < 1.5 {
        input.move_direction = Vec2::new(0.0, 1.0);
        input.look_rotation = Vec2::new(0.0, 0.6);
        input.sprint = true;
    } else if t < 2.0 {
        input.look_rotation = Vec2::new(0.0, 0.6);
        input.jump = press(1.6);
    } else if t < 2.6 {
        input.aim = true;
        input.look_rotation = Vec2::new(0.05, 0.0);
        input.fire = press(2.2) || press(2.3) || press(2.5);
    }
    input
}

fn build_level() -> RapierProbe {
    let mut world = CollisionWorld::new();
    world.add_floor(0.0, FLOOR_LAYER);
    world.add_static_box(Vec3::new(0.0, 3.0, 30.5), Vec3::new(10.0, 3.0, 0.5), TARGET_LAYER);
    RapierProbe::new(world)
}

fn run(config: &Config) -> Result<(), SimError> {
    let level = build_level();
    let mut authority = Authority::new(Vec3::ZERO, &level, &level, config);
    let mut observer = Observer::new(*authority.latest(), config);

    let mut authority_clock = TickScheduler::from_config(&config.tick);
    let mut observer_clock = TickScheduler::from_config(&config.tick);
    let mut authority_sink = LogSink::new("authority");
    let mut observer_sink = LogSink::new("observer");

    let mut t = 0.0;
    let mut next_observer_frame = 0.0;
    while t < DURATION_SECS {
        authority.submit_input(scripted_input(t));
        step_frame(
            &mut authority_clock,
            &mut authority,
            AUTHORITY_FRAME_SECS,
            &mut authority_sink,
        )?;

        for bytes in authority.outbox_mut().drain() {
            match observer.receive_bytes(&bytes) {
                Ok(()) => {}
                Err(SimError::Replication(ReplicationError::StaleSnapshot { .. })) => {
                    warn!("dropping stale snapshot");
                }
                Err(e) => return Err(e),
            }
        }

        while next_observer_frame <= t {
            step_frame(
                &mut observer_clock,
                &mut observer,
                OBSERVER_FRAME_SECS,
                &mut observer_sink,
            )?;
            next_observer_frame += OBSERVER_FRAME_SECS;
        }

        t += AUTHORITY_FRAME_SECS;
    }

    let state = authority.state();
    info!(
        ticks = authority.tick(),
        position = ?state.position,
        speed = state.horizontal_speed(),
        fire_count = authority.properties().fire_count,
        "authority finished"
    );
    info!(
        committed_tick = observer.latest().tick,
        authority_effects = authority_sink.effects_played,
        observer_effects = observer_sink.effects_played,
        "observer finished"
    );
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("kestrel"));

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    kestrel_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        tick_rate_hz = config.tick.tick_rate_hz,
        walk_speed = config.movement.walk_speed,
        "kestrel demo starting"
    );

    if let Err(e) = run(&config) {
        error!("demo aborted: {e}");
        std::process::exit(1);
    }
}
