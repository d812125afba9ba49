//! Presentation seams
//!
//! The engine never renders anything itself. It calls `highlight` and
//! `unhighlight` on a [`HighlightSink`]; the controller additionally tells a
//! [`TranscriptView`] which chapter text to show, or which error to show
//! instead.

use crate::cues::{Cue, CueStore, TranscriptSection};
use crate::loader::ChapterNumber;

/// Receives highlight transitions from the sync engine
pub trait HighlightSink {
    fn highlight(&mut self, cue: &Cue);
    fn unhighlight(&mut self, cue: &Cue);
}

/// Everything the playback controller shows
pub trait TranscriptView: HighlightSink {
    /// A chapter's text replaced whatever was shown before
    fn show_transcript(&mut self, chapter: ChapterNumber, section: &TranscriptSection, cues: &CueStore);

    /// Shown in place of the transcript when loading failed
    fn show_error(&mut self, chapter: ChapterNumber, message: &str);

    /// Last chapter finished without chapter repeat
    fn show_stopped(&mut self);
}

/// One observable presentation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Highlight(usize),
    Unhighlight(usize),
    Transcript { chapter: u16, cues: usize },
    Error { chapter: u16, message: String },
    Stopped,
}

/// A view that records every call, in order
///
/// Cues are identified by their sequence index.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
    highlighted: Option<usize>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Drain recorded events, keeping the highlight state
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Sequence index of the currently highlighted cue
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlight_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ViewEvent::Highlight(_)))
            .count()
    }
}

impl HighlightSink for RecordingView {
    fn highlight(&mut self, cue: &Cue) {
        // Two highlighted cues at once would mean the engine skipped an unhighlight
        debug_assert!(self.highlighted.is_none(), "highlight while another cue is highlighted");
        self.highlighted = Some(cue.sequence_index());
        self.events.push(ViewEvent::Highlight(cue.sequence_index()));
    }

    fn unhighlight(&mut self, cue: &Cue) {
        if self.highlighted == Some(cue.sequence_index()) {
            self.highlighted = None;
        }
        self.events.push(ViewEvent::Unhighlight(cue.sequence_index()));
    }
}

impl TranscriptView for RecordingView {
    fn show_transcript(&mut self, chapter: ChapterNumber, _section: &TranscriptSection, cues: &CueStore) {
        self.events.push(ViewEvent::Transcript {
            chapter: chapter.get(),
            cues: cues.len(),
        });
    }

    fn show_error(&mut self, chapter: ChapterNumber, message: &str) {
        self.events.push(ViewEvent::Error {
            chapter: chapter.get(),
            message: message.to_string(),
        });
    }

    fn show_stopped(&mut self) {
        self.events.push(ViewEvent::Stopped);
    }
}
