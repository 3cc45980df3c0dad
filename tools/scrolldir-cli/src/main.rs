//! scrolldir CLI: replay and inspect scroll traces.
//!
//! Usage:
//!   scrolldir replay <TRACE>     Run the direction watcher over a trace
//!   scrolldir validate <TRACE>   Check a trace for problems
//!   scrolldir synth <OUT>        Write a synthetic trace
//!   scrolldir config             Show (or save) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "scrolldir",
    about = "Scroll direction detection with jitter and rubber-band filtering",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace through the scroll direction watcher
    Replay {
        /// Path to the JSONL trace
        path: PathBuf,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,

        /// Initial direction: down|up (defaults to the configured one)
        #[arg(long)]
        direction: Option<String>,

        /// Reversal threshold in pixels
        #[arg(long)]
        threshold: Option<f64>,

        /// Pivot expiry in milliseconds
        #[arg(long)]
        max_age: Option<f64>,
    },

    /// Validate a trace file
    Validate {
        /// Path to the JSONL trace
        path: PathBuf,
    },

    /// Write a deterministic synthetic trace
    Synth {
        /// Output file path
        output: PathBuf,

        /// Viewport height (px)
        #[arg(long)]
        viewport: Option<f64>,

        /// Document height (px)
        #[arg(long)]
        document: Option<f64>,

        /// Refresh rate recorded in the header (Hz)
        #[arg(long)]
        fps: Option<u32>,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the standard config location
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = scrolldir_common::config::AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    scrolldir_common::logging::init_logging(&logging)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {e}"))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    match cli.command {
        Commands::Replay {
            path,
            json,
            direction,
            threshold,
            max_age,
        } => commands::replay::run(&config, path, json, direction, threshold, max_age),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Synth {
            output,
            viewport,
            document,
            fps,
        } => commands::synth::run(&config, output, viewport, document, fps),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
