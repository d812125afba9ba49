//! CLI Module
//!
//! Command-line interface for inspecting transcripts and simulating playback.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::loader::ChapterNumber;

/// Recital - cue-synchronised transcript playback
#[derive(Parser, Debug)]
#[command(name = "recital")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Player config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a transcript timestamp and print it in seconds
    #[command(name = "parse-time")]
    ParseTime {
        /// Timestamp text, e.g. `01:02:03:500` or `1:02.5`
        text: String,
    },

    /// List chapters with their audio and transcript availability
    #[command(name = "chapters")]
    Chapters,

    /// Print the cue table of one chapter
    #[command(name = "cues")]
    Cues {
        /// Chapter number (`7`, `007` or `D007`)
        #[arg(short, long)]
        chapter: ChapterNumber,
    },

    /// Play chapters on a simulated transport and print highlight changes
    #[command(name = "simulate")]
    Simulate {
        /// Chapter to start from
        #[arg(short, long, default_value = "1")]
        chapter: ChapterNumber,

        /// Seconds of playback per tick
        #[arg(short, long, default_value_t = 0.25)]
        step: f64,

        /// Restart the chapter when it ends
        #[arg(long)]
        repeat_chapter: bool,

        /// Loop the active cue
        #[arg(long)]
        repeat_subsection: bool,

        /// Stop after this many ticks
        #[arg(long, default_value_t = 10_000)]
        max_ticks: usize,
    },
}
