//! Aligned-JSON transcript builder
//!
//! Reads the recitation JSON produced by the forced-alignment tooling:
//!
//! ```json
//! [{ "id": "D001", "title": "...", "audio": "Narayaneeyam_D001.mp3",
//!    "verses": [{ "verse_number": "1a", "time": 0.0, "text": "...",
//!                 "words": [{ "time": 0.0, "text": "..." }] }] }]
//! ```
//!
//! A single recitation object without the surrounding list is accepted too.
//! Verses carry only a start time; a verse ends where the next begins, and
//! the last verse runs for a fixed trailing duration.

use log::info;
use serde::{Deserialize, Serialize};

use super::content::{ChapterTranscript, ContentId, ContentUnit, TranscriptSection};
use super::cue::CueDraft;
use super::store::CueStore;
use super::CueGranularity;
use crate::error::{RecitalError, Result};
use crate::timecode;

/// One chapter's alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recitation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default)]
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default)]
    pub verse_number: String,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<WordTiming>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    #[serde(default)]
    pub time: f64,
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecitationFile {
    Many(Vec<Recitation>),
    One(Recitation),
}

/// Parse a recitation file (list or single object)
pub fn parse_recitations(json: &str) -> Result<Vec<Recitation>> {
    let file: RecitationFile = serde_json::from_str(json)?;
    Ok(match file {
        RecitationFile::Many(list) => list,
        RecitationFile::One(single) => vec![single],
    })
}

/// Find the recitation with `id` and cut it into cues
pub fn chapter_transcript(
    recitations: &[Recitation],
    chapter: u16,
    id: &str,
    granularity: CueGranularity,
    trailing_secs: f64,
) -> Result<ChapterTranscript> {
    let id = id.trim();
    let recitation = recitations
        .iter()
        .find(|r| r.id.trim() == id)
        .ok_or_else(|| RecitalError::ChapterNotFound {
            chapter,
            key: id.to_string(),
        })?;

    if !(trailing_secs.is_finite() && trailing_secs > 0.0) {
        return Err(RecitalError::InvalidTranscript {
            reason: format!("trailing cue duration must be positive, got {}", trailing_secs),
        });
    }

    Ok(recitation.transcript(granularity, trailing_secs))
}

impl Recitation {
    /// Build the section and cue store for this recitation
    pub fn transcript(&self, granularity: CueGranularity, trailing_secs: f64) -> ChapterTranscript {
        let mut section = TranscriptSection {
            heading: self.title.clone(),
            ..Default::default()
        };
        let mut drafts = Vec::new();

        for (block, verse) in self.verses.iter().enumerate() {
            section.blocks.push(verse.text.clone());

            let start = verse.time;
            let end = self
                .verses
                .get(block + 1)
                .map(|next| next.time)
                .unwrap_or(start + trailing_secs);

            match granularity {
                CueGranularity::Verse => {
                    let id = push_unit(&mut section, &verse.text, block);
                    drafts.push(draft(start, end, id));
                }
                CueGranularity::Word => {
                    for (i, word) in verse.words.iter().enumerate() {
                        let word_end = verse.words.get(i + 1).map(|w| w.time).unwrap_or(end);
                        let id = push_unit(&mut section, &word.text, block);
                        drafts.push(draft(word.time, word_end, id));
                    }
                }
            }
        }

        let cues = CueStore::from_drafts(drafts);
        info!("Recitation {}: {} verses, {} cues", self.id, self.verses.len(), cues.len());
        ChapterTranscript { section, cues }
    }
}

fn push_unit(section: &mut TranscriptSection, text: &str, block: usize) -> ContentId {
    let id = ContentId(section.units.len());
    section.units.push(ContentUnit {
        text: text.trim().to_string(),
        html: None,
        block,
    });
    id
}

fn draft(start: f64, end: f64, id: ContentId) -> CueDraft {
    CueDraft::new(timecode::from_seconds(start), timecode::from_seconds(end), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const JSON: &str = r#"[
        {
            "id": "D001",
            "title": "Narayaneeyam - Chapter 1",
            "audio": "Narayaneeyam_D001.mp3",
            "verses": [
                { "verse_number": "1a", "time": 0.0, "text": "sāndrānanda avabodha",
                  "words": [{ "time": 0.0, "text": "sāndrānanda" }, { "time": 2.5, "text": "avabodha" }] },
                { "verse_number": "1b", "time": 6.0, "text": "anupamitam",
                  "words": [{ "time": 6.0, "text": "anupamitam" }] }
            ]
        },
        { "id": "D002", "verses": [] }
    ]"#;

    #[test]
    fn test_parse_list_and_single() {
        assert_eq!(parse_recitations(JSON).unwrap().len(), 2);

        let single = r#"{ "id": "D005", "verses": [{ "time": 1.0, "text": "x" }] }"#;
        let parsed = parse_recitations(single).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "D005");
    }

    #[test]
    fn test_verse_cues_end_at_next_verse() {
        let recitations = parse_recitations(JSON).unwrap();
        let chapter = chapter_transcript(&recitations, 1, "D001", CueGranularity::Verse, 5.0).unwrap();

        assert_eq!(chapter.section.heading, "Narayaneeyam - Chapter 1");
        assert_eq!(chapter.cues.len(), 2);

        let first = chapter.cues.get(0).unwrap();
        assert_relative_eq!(first.end().as_secs(), 6.0);

        // Last verse gets the trailing duration
        let last = chapter.cues.get(1).unwrap();
        assert_relative_eq!(last.start().as_secs(), 6.0);
        assert_relative_eq!(last.end().as_secs(), 11.0);
        assert_eq!(chapter.cue_text(last.content()), "anupamitam");
    }

    #[test]
    fn test_word_cues() {
        let recitations = parse_recitations(JSON).unwrap();
        let chapter = chapter_transcript(&recitations, 1, "D001", CueGranularity::Word, 5.0).unwrap();

        let ends: Vec<f64> = chapter.cues.iter().map(|c| c.end().as_secs()).collect();
        assert_eq!(ends, vec![2.5, 6.0, 11.0]);
        assert_eq!(chapter.cue_text(chapter.cues.get(1).unwrap().content()), "avabodha");
        assert_eq!(chapter.section.unit(ContentId(1)).unwrap().block, 0);
    }

    #[test]
    fn test_empty_recitation_has_no_cues() {
        let recitations = parse_recitations(JSON).unwrap();
        let chapter = chapter_transcript(&recitations, 2, "D002", CueGranularity::Verse, 5.0).unwrap();
        assert!(chapter.cues.is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let recitations = parse_recitations(JSON).unwrap();
        let err = chapter_transcript(&recitations, 9, "D009", CueGranularity::Verse, 5.0).unwrap_err();
        assert_eq!(err.error_code(), "CHAPTER_NOT_FOUND");
    }

    #[test]
    fn test_rejects_bad_trailing_duration() {
        let recitations = parse_recitations(JSON).unwrap();
        assert!(chapter_transcript(&recitations, 1, "D001", CueGranularity::Verse, 0.0).is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_recitations("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
