//! Recital CLI - Cue-Synchronised Transcript Playback
//!
//! Command-line interface for the Recital player engine.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use recital::cli::commands::{self, SimulateOptions};
use recital::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    info!("Recital v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd, cli.config.as_deref()),
        None => {
            println!("Recital v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Commands::ParseTime { text } => commands::parse_time(&text),
        Commands::Chapters => commands::list_chapters(&commands::load_config(config_path)?),
        Commands::Cues { chapter } => commands::show_cues(&commands::load_config(config_path)?, chapter),
        Commands::Simulate {
            chapter,
            step,
            repeat_chapter,
            repeat_subsection,
            max_ticks,
        } => commands::simulate(
            &commands::load_config(config_path)?,
            &SimulateOptions {
                chapter,
                step,
                repeat_chapter,
                repeat_subsection,
                max_ticks,
            },
        ),
    }
}
