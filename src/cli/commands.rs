//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use walkdir::WalkDir;

use crate::config::PlayerConfig;
use crate::cues::{Cue, CueStore, TranscriptSection};
use crate::engine::{
    EndAction, HighlightSink, MediaTransport, PlaybackController, SimulatedTransport, TranscriptView,
};
use crate::loader::{ChapterNumber, ContentLoader, TranscriptSource};
use crate::timecode::{self, TimeCode};

/// Media length used when a chapter has no cues to measure
const FALLBACK_DURATION_SECS: f64 = 30.0;

/// Longest cue text printed before truncation
const MAX_TEXT_CHARS: usize = 60;

/// Options of the `simulate` command
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub chapter: ChapterNumber,
    pub step: f64,
    pub repeat_chapter: bool,
    pub repeat_subsection: bool,
    pub max_ticks: usize,
}

/// Read the config file (or defaults) and apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<PlayerConfig> {
    let Some(path) = path else {
        return PlayerConfig::from_env().context("invalid configuration");
    };
    let mut config =
        PlayerConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))?;
    config.apply_env();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn loader(config: &PlayerConfig) -> Result<ContentLoader<Box<dyn TranscriptSource + Send + Sync>>> {
    let source = config.transcript_source()?;
    info!("Transcript source: {}", source.location());
    Ok(ContentLoader::from_config(source, config))
}

/// Parse a timestamp and print both forms.
pub fn parse_time(text: &str) -> Result<()> {
    let time = timecode::parse(text);
    println!("{:?} -> {:.3}s ({})", text, time.as_secs(), time);
    Ok(())
}

/// List chapters with audio and transcript availability.
pub fn list_chapters(config: &PlayerConfig) -> Result<()> {
    let audio_files: HashSet<String> = if config.audio_dir.is_dir() {
        WalkDir::new(&config.audio_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    } else {
        warn!("Audio directory {} not found", config.audio_dir.display());
        HashSet::new()
    };

    let loader = loader(config)?;
    let keys: HashSet<String> = match loader.available_keys() {
        Ok(keys) => keys.into_iter().collect(),
        Err(e) => {
            warn!("Transcript unavailable: {}", e);
            HashSet::new()
        }
    };

    println!("{:<12} {:<28} {:<6} {:<5}", "Chapter", "Audio", "Audio?", "Text?");
    println!("{:-<56}", "");

    let mut complete = 0;
    for chapter in ChapterNumber::all(config.last_chapter()) {
        let file = chapter.audio_file_name(&config.work_name, &config.audio_extension);
        let has_audio = audio_files.contains(&file);
        let has_text = keys.contains(&loader.transcript_key(chapter));
        if has_audio && has_text {
            complete += 1;
        }
        println!(
            "{:<12} {:<28} {:<6} {:<5}",
            chapter.label(),
            file,
            yes_no(has_audio),
            yes_no(has_text)
        );
    }

    println!("{:-<56}", "");
    println!("{} of {} chapters complete", complete, config.last_chapter().get());
    Ok(())
}

/// Print the cue table of one chapter.
pub fn show_cues(config: &PlayerConfig, chapter: ChapterNumber) -> Result<()> {
    let outcome = loader(config)?.load(chapter);
    let transcript = outcome
        .transcript
        .with_context(|| format!("no transcript for {}", chapter.label()))?;

    println!("{} ({})", chapter.label(), transcript.section.heading);
    println!("Audio: {}", outcome.audio.display());
    println!("{:-<80}", "");

    if transcript.cues.is_empty() {
        println!("No timed cues.");
        return Ok(());
    }

    for cue in &transcript.cues {
        println!(
            "{:>4}  {:>10} - {:<10}  {}",
            cue.sequence_index(),
            cue.start().to_string(),
            cue.end().to_string(),
            truncate(transcript.cue_text(cue.content()))
        );
    }

    println!("{:-<80}", "");
    println!("{} cues", transcript.cues.len());
    Ok(())
}

/// Run chapters through the controller on a simulated transport.
pub fn simulate(config: &PlayerConfig, options: &SimulateOptions) -> Result<()> {
    if !(options.step.is_finite() && options.step > 0.0) {
        bail!("step must be a positive number of seconds, got {}", options.step);
    }

    let mut config = config.clone();
    config.repeat_chapter |= options.repeat_chapter;
    config.repeat_subsection |= options.repeat_subsection;

    let mut player = PlaybackController::new(SimulatedTransport::new(), loader(&config)?, &config);
    let mut view = PrintingView::default();

    player.select_chapter(options.chapter, &mut view);
    fit_duration(&mut player);
    if !player.play() {
        bail!("transport refused to play");
    }

    let mut ticks = 0;
    while ticks < options.max_ticks {
        ticks += 1;
        let ended = player.transport_mut().advance(options.step);
        view.position = timecode::from_seconds(player.transport().position());
        player.on_time_update(&mut view);

        if ended {
            match player.on_media_ended(&mut view) {
                EndAction::Finished => break,
                EndAction::Advanced(_) => fit_duration(&mut player),
                EndAction::RestartedChapter => {}
            }
        }
    }

    println!(
        "Stopped after {} ticks in {} at {}",
        ticks,
        player.state().current_chapter().label(),
        timecode::from_seconds(player.transport().position())
    );
    Ok(())
}

/// Simulated media lasts until the last cue ends
fn fit_duration<S: TranscriptSource>(player: &mut PlaybackController<SimulatedTransport, S>) {
    let duration = player.cues().end().unwrap_or(FALLBACK_DURATION_SECS);
    player.transport_mut().set_duration(Some(duration));
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_TEXT_CHARS - 3).collect();
        format!("{}...", head)
    }
}

/// Prints presentation calls to stdout
#[derive(Debug, Default)]
struct PrintingView {
    section: TranscriptSection,
    position: TimeCode,
}

impl HighlightSink for PrintingView {
    fn highlight(&mut self, cue: &Cue) {
        println!(
            "[{}] + #{} {}",
            self.position,
            cue.sequence_index(),
            truncate(self.section.text(cue.content()))
        );
    }

    fn unhighlight(&mut self, cue: &Cue) {
        println!("[{}] - #{}", self.position, cue.sequence_index());
    }
}

impl TranscriptView for PrintingView {
    fn show_transcript(&mut self, chapter: ChapterNumber, section: &TranscriptSection, cues: &CueStore) {
        self.section = section.clone();
        self.position = TimeCode::ZERO;
        println!("== {} ({} cues) ==", chapter.label(), cues.len());
    }

    fn show_error(&mut self, chapter: ChapterNumber, message: &str) {
        self.section = TranscriptSection::default();
        self.position = TimeCode::ZERO;
        println!("== {} unavailable: {} ==", chapter.label(), message);
    }

    fn show_stopped(&mut self) {
        println!("== Stopped ==");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short"), "short");
        let long = "x".repeat(100);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_TEXT_CHARS);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_simulate_rejects_bad_step() {
        let options = SimulateOptions {
            chapter: ChapterNumber::FIRST,
            step: 0.0,
            repeat_chapter: false,
            repeat_subsection: false,
            max_ticks: 1,
        };
        assert!(simulate(&PlayerConfig::default(), &options).is_err());
    }
}
