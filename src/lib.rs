//! Recital - Cue-Synchronised Transcript Playback
//!
//! Recital keeps a spoken-text transcript in step with its audio: as the
//! playhead moves, exactly one cue (a verse or a word) is highlighted.
//!
//! # Architecture
//!
//! Data flows in one direction per chapter load:
//! - Content loader: fetches the transcript and names the audio resource
//! - Cue store: ordered, immutable time ranges built once per chapter
//! - Sync engine: maps each position tick to the active cue
//! - Playback controller: drives the media transport and chapter policy
//!
//! Timestamps in transcripts go through the [`timecode`] parser, which never
//! fails: malformed input reads as 0 seconds.

pub mod cli;
pub mod config;
pub mod cues;
pub mod engine;
pub mod error;
pub mod loader;
pub mod timecode;

pub use config::PlayerConfig;
pub use error::{RecitalError, Result};
pub use timecode::TimeCode;
