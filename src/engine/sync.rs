//! Sync Engine
//!
//! Maps playback position to the active cue of the installed [`CueStore`]
//! and enforces sub-segment repeat.
//!
//! Per position tick:
//! 1. With sub-segment repeat on and a cue active, a position at or past
//!    that cue's end requests a seek back to its start. The highlight is
//!    held. This fires on every tick until the position drops below the end
//!    again, so a slow seek is simply requested again.
//! 2. Otherwise the first cue in store order containing the position becomes
//!    the candidate. If it differs from the active cue, the old one is
//!    unhighlighted and the new one highlighted. No candidate clears the
//!    highlight (a gap between cues).
//!
//! Ticks may arrive out of order (user seeks backwards); each tick is judged
//! on its own position only.

use log::{debug, warn};

use super::view::HighlightSink;
use crate::cues::{Cue, CueStore};
use crate::timecode::TimeCode;

/// Highlight state read by the renderer and the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncState {
    active: Option<usize>,
    repeat_subsection: bool,
}

impl SyncState {
    /// Store index of the active cue
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn repeat_subsection(&self) -> bool {
        self.repeat_subsection
    }
}

/// Highlight change caused by one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transition {
    /// Same cue (or still none) as before
    #[default]
    Unchanged,
    /// `to` became active; `from` was unhighlighted first if present
    Highlighted { from: Option<usize>, to: usize },
    /// `from` was unhighlighted and nothing replaced it
    Cleared { from: usize },
}

/// Result of a position tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub transition: Transition,
    /// Sub-segment repeat wants the transport moved here
    pub seek_to: Option<TimeCode>,
}

/// Position-to-cue state machine for the installed chapter
#[derive(Debug, Clone, Default)]
pub struct SyncEngine {
    store: CueStore,
    state: SyncState,
}

impl SyncEngine {
    /// Engine with an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: CueStore) -> Self {
        Self {
            store,
            state: SyncState::default(),
        }
    }

    pub fn store(&self) -> &CueStore {
        &self.store
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn active_cue(&self) -> Option<&Cue> {
        self.state.active.and_then(|index| self.store.get(index))
    }

    pub fn repeat_subsection(&self) -> bool {
        self.state.repeat_subsection
    }

    pub fn set_repeat_subsection(&mut self, enabled: bool) {
        debug!("[SYNC] Sub-segment repeat {}", if enabled { "on" } else { "off" });
        self.state.repeat_subsection = enabled;
    }

    /// Replace the store in one step
    ///
    /// The previous active cue is unhighlighted and forgotten before the new
    /// store is visible, so no tick ever sees old cues with a cleared state
    /// or new cues with an old active index.
    pub fn install(&mut self, store: CueStore, sink: &mut (impl HighlightSink + ?Sized)) {
        self.clear(sink);
        debug!("[SYNC] Installed store with {} cues", store.len());
        self.store = store;
    }

    /// Unhighlight and forget the active cue
    pub fn clear(&mut self, sink: &mut (impl HighlightSink + ?Sized)) -> Transition {
        self.apply(None, sink)
    }

    /// Evaluate a position tick
    pub fn on_tick(&mut self, position: f64, sink: &mut (impl HighlightSink + ?Sized)) -> TickOutcome {
        if !position.is_finite() {
            warn!("[SYNC] Ignoring non-finite position {}", position);
            return TickOutcome::default();
        }

        if self.state.repeat_subsection {
            if let Some(cue) = self.active_cue() {
                if position >= cue.end().as_secs() {
                    debug!(
                        "[SYNC] Repeat cue {}: {:.3}s >= {}, seeking to {}",
                        cue.sequence_index(),
                        position,
                        cue.end(),
                        cue.start()
                    );
                    return TickOutcome {
                        transition: Transition::Unchanged,
                        seek_to: Some(cue.start()),
                    };
                }
            }
        }

        let candidate = self.store.find_active(position);
        TickOutcome {
            transition: self.apply(candidate, sink),
            seek_to: None,
        }
    }

    /// Re-evaluate after a user seek
    ///
    /// Unlike [`on_tick`](Self::on_tick) this never requests a repeat seek:
    /// the user moved the playhead on purpose, so the position decides the
    /// active cue outright.
    pub fn reposition(&mut self, position: f64, sink: &mut (impl HighlightSink + ?Sized)) -> Transition {
        if !position.is_finite() {
            warn!("[SYNC] Ignoring non-finite seek position {}", position);
            return Transition::Unchanged;
        }
        let candidate = self.store.find_active(position);
        self.apply(candidate, sink)
    }

    fn apply(&mut self, candidate: Option<usize>, sink: &mut (impl HighlightSink + ?Sized)) -> Transition {
        let previous = self.state.active;
        if previous == candidate {
            return Transition::Unchanged;
        }

        if let Some(cue) = previous.and_then(|index| self.store.get(index)) {
            sink.unhighlight(cue);
        }
        if let Some(cue) = candidate.and_then(|index| self.store.get(index)) {
            sink.highlight(cue);
        }
        self.state.active = candidate;

        let transition = match (previous, candidate) {
            (from, Some(to)) => Transition::Highlighted { from, to },
            (Some(from), None) => Transition::Cleared { from },
            (None, None) => Transition::Unchanged,
        };
        debug!("[SYNC] {:?}", transition);
        transition
    }
}
