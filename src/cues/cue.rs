//! Cue records

use serde::Serialize;

use super::content::ContentId;
use crate::timecode::TimeCode;

/// One recitable unit of a chapter
///
/// `end > start` always holds; the store refuses anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cue {
    start: TimeCode,
    end: TimeCode,
    sequence_index: usize,
    content: ContentId,
}

impl Cue {
    pub(crate) fn new(start: TimeCode, end: TimeCode, sequence_index: usize, content: ContentId) -> Self {
        debug_assert!(end > start);
        Self {
            start,
            end,
            sequence_index,
            content,
        }
    }

    pub fn start(&self) -> TimeCode {
        self.start
    }

    pub fn end(&self) -> TimeCode {
        self.end
    }

    /// Position within the chapter, 0-based
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    /// Renderable unit this cue refers to
    pub fn content(&self) -> ContentId {
        self.content
    }

    /// Half-open containment: `start <= position < end`
    pub fn contains(&self, position: f64) -> bool {
        self.start.as_secs() <= position && position < self.end.as_secs()
    }

    pub fn duration_secs(&self) -> f64 {
        self.end.as_secs() - self.start.as_secs()
    }
}

/// A cue before the store has validated and numbered it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueDraft {
    pub start: TimeCode,
    pub end: TimeCode,
    pub content: ContentId,
}

impl CueDraft {
    pub fn new(start: TimeCode, end: TimeCode, content: ContentId) -> Self {
        Self { start, end, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::parse;

    #[test]
    fn test_contains_is_half_open() {
        let cue = Cue::new(parse("10"), parse("15"), 0, ContentId(0));
        assert!(!cue.contains(9.999));
        assert!(cue.contains(10.0));
        assert!(cue.contains(14.999));
        assert!(!cue.contains(15.0));
    }

    #[test]
    fn test_duration() {
        let cue = Cue::new(parse("00:10"), parse("00:12.5"), 3, ContentId(7));
        assert_eq!(cue.duration_secs(), 2.5);
        assert_eq!(cue.sequence_index(), 3);
        assert_eq!(cue.content(), ContentId(7));
    }
}
