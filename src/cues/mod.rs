//! Cue Module
//!
//! Everything a chapter's transcript turns into before playback starts:
//! - `Cue` records with precomputed start/end seconds
//! - `CueStore`, the ordered per-chapter list the sync engine scans
//! - Builders for HTML and aligned-JSON transcripts

pub mod aligned;
pub mod content;
pub mod cue;
pub mod html;
pub mod store;

use serde::{Deserialize, Serialize};

pub use aligned::{parse_recitations, Recitation, Verse, WordTiming};
pub use content::{ChapterTranscript, ContentId, ContentUnit, TranscriptSection};
pub use cue::{Cue, CueDraft};
pub use html::HtmlTranscript;
pub use store::CueStore;

/// How finely an aligned transcript is cut into cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueGranularity {
    /// One cue per verse line
    #[default]
    Verse,
    /// One cue per timed word
    Word,
}
