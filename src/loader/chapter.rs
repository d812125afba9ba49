//! Chapter numbering and resource naming
//!
//! Chapters run 1..=100 and are zero-padded to three digits wherever they
//! appear in resource names: `Narayaneeyam_D007.mp3`, heading key
//! `Narayaneeyam D007`, recitation id `D007`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecitalError, Result};

/// Highest chapter number the naming scheme supports
pub const MAX_CHAPTER: u16 = 100;

/// A chapter number in `1..=MAX_CHAPTER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ChapterNumber(u16);

impl ChapterNumber {
    pub const FIRST: ChapterNumber = ChapterNumber(1);
    pub const LAST: ChapterNumber = ChapterNumber(MAX_CHAPTER);

    /// Validate a chapter number
    ///
    /// # Example
    /// ```
    /// use recital::loader::ChapterNumber;
    /// assert_eq!(ChapterNumber::new(7).unwrap().padded(), "007");
    /// assert!(ChapterNumber::new(0).is_err());
    /// ```
    pub fn new(number: u16) -> Result<Self> {
        if (1..=MAX_CHAPTER).contains(&number) {
            Ok(Self(number))
        } else {
            Err(RecitalError::ChapterOutOfRange {
                chapter: i64::from(number),
                last: MAX_CHAPTER,
            })
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Three-digit zero-padded form, e.g. `"042"`
    pub fn padded(self) -> String {
        format!("{:03}", self.0)
    }

    /// Label for a chapter selector
    pub fn label(self) -> String {
        format!("Chapter {}", self.0)
    }

    /// Heading key a transcript declares for this chapter: `"<Work> D<NNN>"`
    pub fn heading_key(self, work: &str) -> String {
        format!("{} D{}", work.trim(), self.padded())
    }

    /// Recitation id used by aligned transcripts: `"D<NNN>"`
    pub fn recitation_id(self) -> String {
        format!("D{}", self.padded())
    }

    /// Audio file name: `"<Work>_D<NNN>.<ext>"`
    pub fn audio_file_name(self, work: &str, extension: &str) -> String {
        format!("{}_D{}.{}", work.trim(), self.padded(), extension.trim_start_matches('.'))
    }

    /// Audio path under `dir`
    pub fn audio_path(self, dir: &Path, work: &str, extension: &str) -> PathBuf {
        dir.join(self.audio_file_name(work, extension))
    }

    /// Following chapter, if it does not pass `last`
    pub fn next(self, last: ChapterNumber) -> Option<Self> {
        (self.0 < last.0).then(|| Self(self.0 + 1))
    }

    /// Preceding chapter, if any
    pub fn prev(self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }

    /// Every chapter from 1 through `last`
    pub fn all(last: ChapterNumber) -> impl Iterator<Item = ChapterNumber> {
        (1..=last.0).map(ChapterNumber)
    }
}

impl Default for ChapterNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for ChapterNumber {
    type Error = RecitalError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ChapterNumber> for u16 {
    fn from(chapter: ChapterNumber) -> Self {
        chapter.0
    }
}

impl FromStr for ChapterNumber {
    type Err = RecitalError;

    /// Accepts `"7"`, `"007"` and `"D007"`
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches(['D', 'd']);
        let number: i64 = digits.parse().map_err(|_| RecitalError::InvalidConfig {
            field: "chapter".to_string(),
            reason: format!("not a chapter number: {:?}", s),
        })?;
        u16::try_from(number)
            .ok()
            .and_then(|n| Self::new(n).ok())
            .ok_or(RecitalError::ChapterOutOfRange {
                chapter: number,
                last: MAX_CHAPTER,
            })
    }
}
