//! Rendered transcript content for one chapter
//!
//! The loader owns this; cues only hold a [`ContentId`] into `units`.

use serde::Serialize;

use super::store::CueStore;

/// Index of a [`ContentUnit`] within its [`TranscriptSection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContentId(pub usize);

/// A timed element of the transcript (a verse paragraph, a word)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentUnit {
    /// Plain text with whitespace collapsed
    pub text: String,
    /// Markup as it appeared in the source, if the source was markup
    pub html: Option<String>,
    /// Index of the top-level block containing this unit
    pub block: usize,
}

/// The part of a transcript that belongs to one chapter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptSection {
    /// Chapter heading text
    pub heading: String,
    /// Top-level renderable blocks in document order
    pub blocks: Vec<String>,
    /// Timed units referenced by cues
    pub units: Vec<ContentUnit>,
}

impl TranscriptSection {
    pub fn unit(&self, id: ContentId) -> Option<&ContentUnit> {
        self.units.get(id.0)
    }

    /// Text of a unit, or `""` if it is gone
    pub fn text(&self, id: ContentId) -> &str {
        self.unit(id).map(|u| u.text.as_str()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.units.is_empty()
    }
}

/// A chapter's section together with the cues built from it
#[derive(Debug, Clone, Default)]
pub struct ChapterTranscript {
    pub section: TranscriptSection,
    pub cues: CueStore,
}

impl ChapterTranscript {
    /// Text of the unit a cue points at, or `""` if it is gone
    pub fn cue_text(&self, id: ContentId) -> &str {
        self.section.text(id)
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
