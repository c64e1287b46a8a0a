//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Replay Browser - camera + LiDAR session replay with overlay projection
#[derive(Parser, Debug)]
#[command(
    name = "replay-browser",
    author,
    version,
    about = "Recorded driving session browser with LiDAR overlay",
    long_about = "Replays a recorded driving session at its original capture cadence.\n\n\
                  For each displayed camera frame the temporally nearest LiDAR sweep \n\
                  is projected onto the image plane and dispatched to the configured \n\
                  render sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REPLAY_BROWSER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REPLAY_BROWSER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay the session at its recorded cadence
    Play(PlayArgs),

    /// Render a single frame index and exit
    Seek(SeekArgs),

    /// Display manifest information
    Info(InfoArgs),

    /// Validate manifest file without running
    Validate(ValidateArgs),
}

/// Arguments for the `play` command
#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    /// Path to session manifest (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "session.toml",
        env = "REPLAY_BROWSER_MANIFEST"
    )]
    pub config: PathBuf,

    /// Frame index to start playback from (the scrub position)
    #[arg(long, default_value = "0", env = "REPLAY_BROWSER_START_INDEX")]
    pub start_index: usize,

    /// Override playback speed multiplier from the manifest
    #[arg(long, env = "REPLAY_BROWSER_SPEED")]
    pub speed: Option<f64>,

    /// Maximum number of frames to display (0 = run to end of session)
    #[arg(long, default_value = "0", env = "REPLAY_BROWSER_MAX_FRAMES")]
    pub max_frames: u64,

    /// Validate manifest and open the dataset, then exit without playing
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "REPLAY_BROWSER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `seek` command
#[derive(Parser, Debug, Clone)]
pub struct SeekArgs {
    /// Path to session manifest (TOML or JSON)
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Frame index to render
    #[arg(long)]
    pub index: usize,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to session manifest
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also open the dataset and report frame/scan counts and coverage
    #[arg(long)]
    pub probe: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to session manifest to validate
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
