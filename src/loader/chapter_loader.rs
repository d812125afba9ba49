//! Content Loader
//!
//! Turns a chapter number into the two things playback needs: the audio
//! path and the chapter's transcript (section text plus cue store). Audio
//! and text fail independently; a transcript error never prevents the
//! audio path from being produced.

use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::chapter::ChapterNumber;
use super::source::TranscriptSource;
use crate::config::PlayerConfig;
use crate::cues::{aligned, ChapterTranscript, CueGranularity, HtmlTranscript};
use crate::error::Result;

/// Markup of the transcript document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptFormat {
    /// One HTML document, chapters introduced by attributed headings
    #[default]
    Html,
    /// Recitation JSON from the alignment tooling
    AlignedJson,
}

/// Naming and parsing settings for chapter loads
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSettings {
    pub work_name: String,
    pub format: TranscriptFormat,
    pub chapter_attribute: String,
    pub audio_dir: PathBuf,
    pub audio_extension: String,
    pub granularity: CueGranularity,
    pub trailing_cue_secs: f64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self::from(&PlayerConfig::default())
    }
}

impl From<&PlayerConfig> for LoaderSettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            work_name: config.work_name.clone(),
            format: config.transcript_format,
            chapter_attribute: config.chapter_attribute.clone(),
            audio_dir: config.audio_dir.clone(),
            audio_extension: config.audio_extension.clone(),
            granularity: config.cue_granularity,
            trailing_cue_secs: config.trailing_cue_secs,
        }
    }
}

/// Everything one chapter load produced
#[derive(Debug)]
pub struct LoadOutcome {
    pub chapter: ChapterNumber,
    pub audio: PathBuf,
    pub transcript: Result<ChapterTranscript>,
}

/// Builds per-chapter content from a transcript source
#[derive(Debug, Clone)]
pub struct ContentLoader<S> {
    source: S,
    settings: LoaderSettings,
}

impl<S: TranscriptSource> ContentLoader<S> {
    pub fn new(source: S, settings: LoaderSettings) -> Self {
        Self { source, settings }
    }

    pub fn from_config(source: S, config: &PlayerConfig) -> Self {
        Self::new(source, LoaderSettings::from(config))
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Audio resource for a chapter
    pub fn audio_path(&self, chapter: ChapterNumber) -> PathBuf {
        chapter.audio_path(
            &self.settings.audio_dir,
            &self.settings.work_name,
            &self.settings.audio_extension,
        )
    }

    /// Key the transcript must declare for a chapter
    pub fn transcript_key(&self, chapter: ChapterNumber) -> String {
        match self.settings.format {
            TranscriptFormat::Html => chapter.heading_key(&self.settings.work_name),
            TranscriptFormat::AlignedJson => chapter.recitation_id(),
        }
    }

    /// Load one chapter's audio path and transcript
    pub fn load(&self, chapter: ChapterNumber) -> LoadOutcome {
        let audio = self.audio_path(chapter);
        let transcript = self.load_transcript(chapter);

        match &transcript {
            Ok(t) => info!("Loaded chapter {}: {} cues", chapter, t.cues.len()),
            Err(e) => warn!("Chapter {} transcript unavailable: {}", chapter, e),
        }

        LoadOutcome {
            chapter,
            audio,
            transcript,
        }
    }

    /// Chapter keys the transcript declares, in document order
    pub fn available_keys(&self) -> Result<Vec<String>> {
        let text = self.source.fetch()?;
        Ok(match self.settings.format {
            TranscriptFormat::Html => HtmlTranscript::parse(&text)?.chapter_keys(&self.settings.chapter_attribute),
            TranscriptFormat::AlignedJson => aligned::parse_recitations(&text)?
                .into_iter()
                .map(|r| r.id.trim().to_string())
                .collect(),
        })
    }

    fn load_transcript(&self, chapter: ChapterNumber) -> Result<ChapterTranscript> {
        let text = self.source.fetch()?;
        let key = self.transcript_key(chapter);

        match self.settings.format {
            TranscriptFormat::Html => {
                HtmlTranscript::parse(&text)?.chapter(chapter.get(), &key, &self.settings.chapter_attribute)
            }
            TranscriptFormat::AlignedJson => {
                let recitations = aligned::parse_recitations(&text)?;
                aligned::chapter_transcript(
                    &recitations,
                    chapter.get(),
                    &key,
                    self.settings.granularity,
                    self.settings.trailing_cue_secs,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::source::{FileSource, StaticSource};
    use std::path::Path;

    const HTML: &str = r#"<html><body>
<h2 data-chapter="Narayaneeyam D001">One</h2>
<p data-start="0" data-end="4">a</p>
<p data-start="4" data-end="8">b</p>
<h2 data-chapter="Narayaneeyam D002">Two</h2>
<p data-start="0" data-end="3">c</p>
</body></html>"#;

    fn ch(n: u16) -> ChapterNumber {
        ChapterNumber::new(n).unwrap()
    }

    #[test]
    fn test_load_html_chapter() {
        let loader = ContentLoader::new(StaticSource::new(HTML), LoaderSettings::default());
        let outcome = loader.load(ch(2));

        assert_eq!(outcome.chapter, ch(2));
        assert_eq!(
            outcome.audio,
            Path::new("Audio_Sync_S_Verses_Only").join("Narayaneeyam_D002.mp3")
        );
        let transcript = outcome.transcript.unwrap();
        assert_eq!(transcript.cues.len(), 1);
        assert_eq!(transcript.section.heading, "Two");
    }

    #[test]
    fn test_missing_chapter_still_has_audio() {
        let loader = ContentLoader::new(StaticSource::new(HTML), LoaderSettings::default());
        let outcome = loader.load(ch(3));

        assert!(outcome.audio.ends_with("Narayaneeyam_D003.mp3"));
        assert_eq!(outcome.transcript.unwrap_err().error_code(), "CHAPTER_NOT_FOUND");
    }

    #[test]
    fn test_fetch_failure_is_reported_not_raised() {
        let loader = ContentLoader::new(FileSource::new("/nonexistent/recital/text.html"), LoaderSettings::default());
        let outcome = loader.load(ch(1));
        assert_eq!(outcome.transcript.unwrap_err().error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_aligned_json_chapter() {
        let json = r#"[{ "id": "D001", "title": "One", "verses": [
            { "time": 0.0, "text": "x" }, { "time": 3.0, "text": "y" } ] }]"#;
        let settings = LoaderSettings {
            format: TranscriptFormat::AlignedJson,
            ..LoaderSettings::default()
        };
        let loader = ContentLoader::new(StaticSource::new(json), settings);

        assert_eq!(loader.transcript_key(ch(1)), "D001");
        let transcript = loader.load(ch(1)).transcript.unwrap();
        assert_eq!(transcript.cues.len(), 2);
        assert_eq!(transcript.cues.get(1).unwrap().end().as_secs(), 8.0);
    }

    #[test]
    fn test_available_keys() {
        let loader = ContentLoader::new(StaticSource::new(HTML), LoaderSettings::default());
        assert_eq!(
            loader.available_keys().unwrap(),
            vec!["Narayaneeyam D001", "Narayaneeyam D002"]
        );
    }

    #[test]
    fn test_format_serde_names() {
        let format: TranscriptFormat = serde_json::from_str("\"aligned-json\"").unwrap();
        assert_eq!(format, TranscriptFormat::AlignedJson);
    }
}
