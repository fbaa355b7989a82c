//! Configuration system for the Kestrel character controller.
//!
//! Movement tuning and tick settings persist to disk as a RON file.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FireConfig, MovementConfig, PresentationConfig, TickConfig,
};
pub use error::ConfigError;
