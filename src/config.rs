//! Player configuration
//!
//! Read from a JSON file; every field has a default so a partial file (or
//! none at all) works. A few environment variables override the file.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cues::CueGranularity;
use crate::engine::transport::{clamp_rate, clamp_volume};
use crate::error::{RecitalError, Result};
use crate::loader::{is_remote, ChapterNumber, FileSource, TranscriptFormat, TranscriptSource, MAX_CHAPTER};

/// Overrides `transcript`
pub const ENV_TRANSCRIPT: &str = "RECITAL_TRANSCRIPT";
/// Overrides `audio_dir`
pub const ENV_AUDIO_DIR: &str = "RECITAL_AUDIO_DIR";
/// Overrides `work_name`
pub const ENV_WORK_NAME: &str = "RECITAL_WORK_NAME";
/// Overrides `last_chapter`
pub const ENV_LAST_CHAPTER: &str = "RECITAL_LAST_CHAPTER";

/// Settings for one player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Name used in heading keys and audio file names
    pub work_name: String,

    /// Transcript path, or URL with the `http` feature
    pub transcript: String,

    pub transcript_format: TranscriptFormat,

    /// Heading attribute declaring a chapter's key
    pub chapter_attribute: String,

    pub audio_dir: PathBuf,

    pub audio_extension: String,

    /// Auto-advance stops after this chapter
    pub last_chapter: u16,

    pub playback_rate: f64,

    pub volume: f64,

    pub repeat_chapter: bool,

    pub repeat_subsection: bool,

    pub cue_granularity: CueGranularity,

    /// Length of the final verse cue in aligned transcripts
    pub trailing_cue_secs: f64,

    pub fetch_timeout_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            work_name: "Narayaneeyam".to_string(),
            transcript: "narayaneeyam_text.html".to_string(),
            transcript_format: TranscriptFormat::Html,
            chapter_attribute: "data-chapter".to_string(),
            audio_dir: PathBuf::from("Audio_Sync_S_Verses_Only"),
            audio_extension: "mp3".to_string(),
            last_chapter: MAX_CHAPTER,
            playback_rate: 1.0,
            volume: 1.0,
            repeat_chapter: false,
            repeat_subsection: false,
            cue_granularity: CueGranularity::Verse,
            trailing_cue_secs: 5.0,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl PlayerConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecitalError::FileNotFound {
                path: path.to_path_buf(),
                source: Some(e),
            },
            _ => RecitalError::FileReadError {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let mut config: PlayerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `RECITAL_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(transcript) = env::var(ENV_TRANSCRIPT) {
            self.transcript = transcript;
        }
        if let Ok(dir) = env::var(ENV_AUDIO_DIR) {
            self.audio_dir = PathBuf::from(dir);
        }
        if let Ok(name) = env::var(ENV_WORK_NAME) {
            self.work_name = name;
        }
        if let Ok(last) = env::var(ENV_LAST_CHAPTER) {
            match last.trim().parse() {
                Ok(last) => self.last_chapter = last,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_LAST_CHAPTER, last),
            }
        }
    }

    /// Check ranges, clamping where the transport would clamp anyway
    pub fn validate(&mut self) -> Result<()> {
        if self.work_name.trim().is_empty() {
            return Err(invalid("work_name", "must not be empty"));
        }
        ChapterNumber::new(self.last_chapter)
            .map_err(|_| invalid("last_chapter", &format!("must be within 1..={}", MAX_CHAPTER)))?;

        if self.playback_rate.is_nan() || self.playback_rate <= 0.0 {
            return Err(invalid("playback_rate", "must be greater than 0"));
        }
        if let Some(rate) = clamp_rate(self.playback_rate) {
            self.playback_rate = rate;
        }

        self.volume = clamp_volume(self.volume).ok_or_else(|| invalid("volume", "must be a number"))?;

        if !(self.trailing_cue_secs.is_finite() && self.trailing_cue_secs > 0.0) {
            return Err(invalid("trailing_cue_secs", "must be greater than 0"));
        }
        Ok(())
    }

    /// Last chapter as a validated number
    pub fn last_chapter(&self) -> ChapterNumber {
        ChapterNumber::new(self.last_chapter).unwrap_or(ChapterNumber::LAST)
    }

    /// Build the transcript source this config points at
    pub fn transcript_source(&self) -> Result<Box<dyn TranscriptSource + Send + Sync>> {
        if is_remote(&self.transcript) {
            #[cfg(feature = "http")]
            {
                return Ok(Box::new(crate::loader::HttpSource::new(
                    self.transcript.trim(),
                    self.fetch_timeout_ms,
                )));
            }
            #[cfg(not(feature = "http"))]
            {
                return Err(invalid("transcript", "remote transcripts need the `http` feature"));
            }
        }
        Ok(Box::new(FileSource::new(self.transcript.trim())))
    }
}

fn invalid(field: &str, reason: &str) -> RecitalError {
    RecitalError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
