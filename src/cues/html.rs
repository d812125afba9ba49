//! HTML transcript builder
//!
//! The transcript is one document holding every chapter. Each chapter opens
//! with a heading element whose chapter attribute (by default `data-chapter`)
//! names it, e.g. `<h2 data-chapter="Narayaneeyam D001">`. Everything up to
//! the next heading belongs to that chapter, and any element inside it with
//! `data-start`/`data-end` becomes a cue.

use log::{debug, info};
use scraper::{ElementRef, Html, Selector};

use super::content::{collapse_whitespace, ChapterTranscript, ContentId, ContentUnit, TranscriptSection};
use super::cue::CueDraft;
use super::store::CueStore;
use crate::error::{RecitalError, Result};
use crate::timecode;

/// Attribute carrying a cue's start time
pub const START_ATTRIBUTE: &str = "data-start";
/// Attribute carrying a cue's end time
pub const END_ATTRIBUTE: &str = "data-end";

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// A parsed transcript document
pub struct HtmlTranscript {
    document: Html,
    body: Selector,
}

impl HtmlTranscript {
    /// Parse a whole transcript document
    pub fn parse(source: &str) -> Result<Self> {
        let body = Selector::parse("body").map_err(|e| RecitalError::InvalidTranscript {
            reason: format!("bad selector: {:?}", e),
        })?;

        Ok(Self {
            document: Html::parse_document(source),
            body,
        })
    }

    /// Chapter keys declared by headings, in document order
    pub fn chapter_keys(&self, attribute: &str) -> Vec<String> {
        self.top_level()
            .filter(|el| is_heading(el))
            .filter_map(|el| el.value().attr(attribute))
            .map(|key| key.trim().to_string())
            .collect()
    }

    /// Extract one chapter's section and cues
    ///
    /// `key` is compared against the heading attribute after trimming both.
    pub fn chapter(&self, chapter: u16, key: &str, attribute: &str) -> Result<ChapterTranscript> {
        let key = key.trim();
        let mut section = TranscriptSection::default();
        let mut drafts = Vec::new();
        let mut found = false;

        for element in self.top_level() {
            if is_heading(&element) {
                if found {
                    break;
                }
                if element.value().attr(attribute).map(str::trim) == Some(key) {
                    found = true;
                    section.heading = collapse_whitespace(&element.text().collect::<String>());
                } else {
                    continue;
                }
            } else if !found {
                continue;
            }

            let block = section.blocks.len();
            section.blocks.push(element.html());
            collect_cues(element, block, &mut section.units, &mut drafts);
        }

        if !found {
            return Err(RecitalError::ChapterNotFound {
                chapter,
                key: key.to_string(),
            });
        }

        let cues = CueStore::from_drafts(drafts);
        info!(
            "Chapter {} ({}): {} blocks, {} cues",
            chapter,
            key,
            section.blocks.len(),
            cues.len()
        );
        Ok(ChapterTranscript { section, cues })
    }

    fn top_level(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.document
            .select(&self.body)
            .next()
            .into_iter()
            .flat_map(|body| body.children().filter_map(ElementRef::wrap))
    }
}

fn is_heading(element: &ElementRef<'_>) -> bool {
    HEADINGS.contains(&element.value().name())
}

fn collect_cues(block_root: ElementRef<'_>, block: usize, units: &mut Vec<ContentUnit>, drafts: &mut Vec<CueDraft>) {
    for node in block_root.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let Some(start) = element.value().attr(START_ATTRIBUTE) else {
            continue;
        };

        let end = element.value().attr(END_ATTRIBUTE);
        let id = ContentId(units.len());
        units.push(ContentUnit {
            text: collapse_whitespace(&element.text().collect::<String>()),
            html: Some(element.html()),
            block,
        });

        debug!("Cue candidate {:?} -> {:?}", start, end);
        drafts.push(CueDraft::new(timecode::parse(start), timecode::parse_opt(end), id));
    }
}
