//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vsplit_models::config::DEFAULT_NAMING_PATTERN;

/// Split long recordings into bounded-duration segments.
#[derive(Parser, Debug)]
#[command(name = "vsplit", version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level based on verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a recording into segments.
    Split(SplitArgs),

    /// Inspect a media file and print its metadata.
    Probe {
        /// File to inspect.
        input: PathBuf,
    },

    /// Check that FFmpeg and FFprobe are installed and accessible.
    #[command(name = "check-tools")]
    CheckTools,
}

/// Arguments for the split subcommand.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input recording to split.
    pub input: PathBuf,

    /// Output directory for segments.
    #[arg(short, long, default_value = "./segments")]
    pub output_dir: PathBuf,

    /// Maximum segment length (e.g., 20m, 1200, 1h30m).
    #[arg(short = 'l', long, default_value = "20m")]
    pub max_length: String,

    /// Path to an intro video prepended to every segment.
    #[arg(long)]
    pub intro: Option<PathBuf>,

    /// Path to an outro video appended to every segment.
    #[arg(long)]
    pub outro: Option<PathBuf>,

    /// Output container format (mp4, mkv, avi, mov, flv, webm, ts).
    #[arg(short, long, default_value = "mp4")]
    pub format: String,

    /// Naming pattern for output files.
    #[arg(long, default_value = DEFAULT_NAMING_PATTERN)]
    pub naming_pattern: String,

    /// Quality preset (high, medium, low).
    #[arg(long, default_value = "high")]
    pub quality: String,

    /// Number of FFmpeg threads.
    #[arg(long, default_value_t = 4)]
    pub threads: u32,

    /// Load the split configuration from a YAML or JSON file instead of
    /// the command-line options.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Save the effective configuration to a file.
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Print the segment plan without processing anything.
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}
