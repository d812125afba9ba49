//! TimeCode Module
//!
//! Canonical numeric time for cue boundaries:
//! - `TimeCode` newtype (non-negative seconds)
//! - Parser for the timestamp spellings found in transcripts

pub mod parser;

use std::fmt;

use serde::Serialize;

pub use parser::{from_seconds, parse, parse_opt};

/// A non-negative position in seconds
///
/// Only the parser constructs these, so every value is finite and `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct TimeCode(f64);

impl TimeCode {
    /// Start of the media
    pub const ZERO: TimeCode = TimeCode(0.0);

    pub(crate) fn new_unchecked(seconds: f64) -> Self {
        debug_assert!(seconds.is_finite() && seconds >= 0.0);
        Self(seconds)
    }

    /// Value in seconds
    pub fn as_secs(self) -> f64 {
        self.0
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.0 * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        if hours > 0 {
            write!(f, "{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
        } else {
            write!(f, "{:02}:{:02}.{:03}", minutes, seconds, millis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_short() {
        assert_eq!(parse("02:03.500").to_string(), "02:03.500");
    }

    #[test]
    fn test_display_with_hours() {
        assert_eq!(parse("01:02:03:004").to_string(), "01:02:03.004");
    }

    #[test]
    fn test_ordering() {
        assert!(parse("00:09") < parse("00:10"));
        assert_eq!(TimeCode::default(), TimeCode::ZERO);
    }
}
