//! Ordered cue list for one chapter
//!
//! Built once per chapter load and never mutated afterwards. Replacing a
//! chapter means building a new store.

use log::{debug, warn};

use super::cue::{Cue, CueDraft};

/// Cues of exactly one chapter, sorted ascending by start
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueStore {
    cues: Vec<Cue>,
}

impl CueStore {
    /// A store with no cues
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate, order and number a batch of drafts
    ///
    /// Drafts with `end <= start` are dropped. The rest are stable-sorted by
    /// start, so drafts sharing a start keep their extraction order, and then
    /// numbered by store position.
    pub fn from_drafts(drafts: impl IntoIterator<Item = CueDraft>) -> Self {
        let mut kept: Vec<CueDraft> = drafts
            .into_iter()
            .filter(|draft| {
                if draft.end > draft.start {
                    true
                } else {
                    warn!(
                        "Dropping cue for content {} with empty range {} -> {}",
                        draft.content.0, draft.start, draft.end
                    );
                    false
                }
            })
            .collect();

        kept.sort_by(|a, b| a.start.as_secs().total_cmp(&b.start.as_secs()));

        let cues: Vec<Cue> = kept
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Cue::new(draft.start, draft.end, index, draft.content))
            .collect();

        debug!("Built cue store with {} cues", cues.len());
        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    /// Index of the first cue in store order with `start <= position < end`
    ///
    /// Linear on purpose: chapters hold tens of cues, and first-match-wins
    /// decides between overlapping or touching cues.
    pub fn find_active(&self, position: f64) -> Option<usize> {
        self.cues.iter().position(|cue| cue.contains(position))
    }

    /// End of the last cue, if any
    pub fn end(&self) -> Option<f64> {
        self.cues
            .iter()
            .map(|cue| cue.end().as_secs())
            .fold(None, |acc: Option<f64>, end| Some(acc.map_or(end, |a| a.max(end))))
    }
}

impl<'a> IntoIterator for &'a CueStore {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}
