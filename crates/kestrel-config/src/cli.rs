//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Kestrel command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "kestrel", about = "Kestrel character controller")]
pub struct CliArgs {
    /// Fixed simulation rate in Hz.
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Walk speed in m/s.
    #[arg(long)]
    pub walk_speed: Option<f32>,

    /// Sprint speed in m/s.
    #[arg(long)]
    pub sprint_speed: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(rate) = args.tick_rate {
            self.tick.tick_rate_hz = rate;
        }
        if let Some(speed) = args.walk_speed {
            self.movement.walk_speed = speed;
        }
        if let Some(speed) = args.sprint_speed {
            self.movement.sprint_speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
