//! Integration Tests
//!
//! End-to-end tests for the Recital pipeline: transcript on disk, content
//! loader, controller, sync engine and a simulated transport.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use recital::cues::CueGranularity;
use recital::engine::{
    EndAction, LoadStatus, MediaTransport, PlaybackController, RecordingView, SimulatedTransport,
    ViewEvent,
};
use recital::loader::{ChapterNumber, ContentLoader, FileSource, TranscriptFormat};
use recital::PlayerConfig;

const TRANSCRIPT: &str = r#"<!DOCTYPE html>
<html><body>
<h1>Narayaneeyam</h1>
<h2 data-chapter="Narayaneeyam D001">Dasakam 1</h2>
<p><span data-start="00:00" data-end="00:04">sAndrAnandAvabOdhAtmakam</span>
   <span data-start="00:04" data-end="00:09.5">anupamitam</span></p>
<p data-start="00:09.5" data-end="00:12">kAladESAvadhibhyAm</p>
<h2 data-chapter="Narayaneeyam D002">Dasakam 2</h2>
<p data-start="0:01" data-end="0:05">sUryaspardhikirITam</p>
<p data-start="0:06" data-end="0:08">UrdhvapuNDra</p>
</body></html>"#;

const ALIGNED: &str = r#"[
  { "id": "D001", "title": "Dasakam 1", "verses": [
      { "verse_number": "1a", "time": 0.0, "text": "om namo",
        "words": [ { "time": 0.0, "text": "om" }, { "time": 0.8, "text": "namo" } ] },
      { "verse_number": "1b", "time": 2.0, "text": "nArAyaNAya",
        "words": [ { "time": 2.0, "text": "nArAyaNAya" } ] } ] }
]"#;

type Player = PlaybackController<SimulatedTransport, FileSource>;

/// Helper to lay out a transcript and config in a temp directory
fn fixture(transcript: &str, file_name: &str) -> (TempDir, PlayerConfig) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    fs::write(&path, transcript).unwrap();

    let config = PlayerConfig {
        transcript: path.display().to_string(),
        audio_dir: dir.path().join("audio"),
        last_chapter: 2,
        ..Default::default()
    };
    (dir, config)
}

fn player(config: &PlayerConfig) -> Player {
    let loader = ContentLoader::from_config(FileSource::new(&config.transcript), config);
    PlaybackController::new(SimulatedTransport::new(), loader, config)
}

fn ch(n: u16) -> ChapterNumber {
    ChapterNumber::new(n).unwrap()
}

/// Advance in fixed steps, ticking the controller, until the media ends
fn play_to_end(player: &mut Player, view: &mut RecordingView, step: f64) -> EndAction {
    let duration = player.cues().end().unwrap_or(1.0);
    player.transport_mut().set_duration(Some(duration));
    for _ in 0..10_000 {
        let ended = player.transport_mut().advance(step);
        player.on_time_update(view);
        if ended {
            return player.on_media_ended(view);
        }
    }
    panic!("media never ended");
}

// === Full Pipeline Tests ===

#[test]
fn test_chapter_plays_through_in_cue_order() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(1), &mut view);
    assert!(player.play());
    view.take_events();

    play_to_end(&mut player, &mut view, 0.25);

    let highlights: Vec<usize> = view
        .events()
        .iter()
        .filter_map(|e| match e {
            ViewEvent::Highlight(i) => Some(*i),
            _ => None,
        })
        .take(2)
        .collect();
    assert_eq!(highlights, vec![1, 2]);
}

#[test]
fn test_auto_advance_then_stop() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(1), &mut view);
    player.play();

    let first = play_to_end(&mut player, &mut view, 0.5);
    assert_eq!(first, EndAction::Advanced(LoadStatus::Installed));
    assert_eq!(player.state().current_chapter(), ch(2));
    assert!(player.state().is_playing());
    assert_eq!(
        player.transport().source(),
        Some(config.audio_dir.join("Narayaneeyam_D002.mp3").as_path())
    );

    let second = play_to_end(&mut player, &mut view, 0.5);
    assert_eq!(second, EndAction::Finished);
    assert!(!player.state().is_playing());
    assert_eq!(player.active_cue(), None);
    assert_eq!(view.highlighted(), None);
    assert_eq!(view.events().last(), Some(&ViewEvent::Stopped));
}

#[test]
fn test_gap_between_cues_clears_highlight() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(2), &mut view);
    // Before the first cue starts
    assert_eq!(view.highlighted(), None);

    player.seek(2.0, &mut view);
    assert_eq!(view.highlighted(), Some(0));

    player.seek(5.5, &mut view);
    assert_eq!(view.highlighted(), None);
    assert_eq!(player.active_cue(), None);
}

#[test]
fn test_repeat_subsection_loops_one_cue() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(1), &mut view);
    player.set_repeat_subsection(true);
    player.transport_mut().set_duration(Some(12.0));
    player.play();

    let mut seeks = 0;
    for _ in 0..60 {
        player.transport_mut().advance(0.25);
        if player.on_time_update(&mut view).seek_to.is_some() {
            seeks += 1;
        }
        assert!(player.transport().position() < 4.0 + 0.25);
    }

    assert!(seeks >= 3);
    assert_eq!(view.highlight_count(), 1);
    assert_eq!(view.highlighted(), Some(0));
}

#[test]
fn test_repeat_chapter_never_advances() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(2), &mut view);
    player.set_repeat_chapter(true);
    player.play();

    for _ in 0..3 {
        assert_eq!(play_to_end(&mut player, &mut view, 1.0), EndAction::RestartedChapter);
        assert_eq!(player.state().current_chapter(), ch(2));
        assert!(player.transport().is_playing());
    }
}

// === Loading and Errors ===

#[test]
fn test_superseded_load_is_ignored() {
    let (_dir, config) = fixture(TRANSCRIPT, "text.html");
    let mut player = player(&config);
    let mut view = RecordingView::new();

    let slow = player.begin_load(ch(1));
    let fast = player.begin_load(ch(2));

    let fast_outcome = player.loader().load(ch(2));
    assert_eq!(player.finish_load(fast, fast_outcome, &mut view), LoadStatus::Installed);

    let slow_outcome = player.loader().load(ch(1));
    assert_eq!(player.finish_load(slow, slow_outcome, &mut view), LoadStatus::Stale);

    assert_eq!(player.state().current_chapter(), ch(2));
    assert_eq!(player.section().heading, "Dasakam 2");
    assert_eq!(
        view.events(),
        &[ViewEvent::Transcript { chapter: 2, cues: 2 }]
    );
}

#[test]
fn test_missing_transcript_degrades_to_no_cues() {
    let dir = TempDir::new().unwrap();
    let config = PlayerConfig {
        transcript: dir.path().join("absent.html").display().to_string(),
        ..Default::default()
    };
    let mut player = player(&config);
    let mut view = RecordingView::new();

    assert_eq!(player.select_chapter(ch(1), &mut view), LoadStatus::Installed);
    assert!(player.play());

    player.transport_mut().advance(3.0);
    player.on_time_update(&mut view);

    assert!(matches!(view.events()[0], ViewEvent::Error { chapter: 1, .. }));
    assert_eq!(view.highlight_count(), 0);
    assert!(player.engine().store().is_empty());
}

#[test]
fn test_unknown_chapter_reports_error() {
    let (_dir, mut config) = fixture(TRANSCRIPT, "text.html");
    config.last_chapter = 3;
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(3), &mut view);

    match &view.events()[0] {
        ViewEvent::Error { chapter, message } => {
            assert_eq!(*chapter, 3);
            assert!(message.contains("chapter 3"), "message was {:?}", message);
        }
        other => panic!("expected an error event, got {:?}", other),
    }
}

// === Aligned JSON ===

#[test]
fn test_aligned_word_cues_drive_highlight() {
    let (_dir, mut config) = fixture(ALIGNED, "aligned.json");
    config.transcript_format = TranscriptFormat::AlignedJson;
    config.cue_granularity = CueGranularity::Word;
    let mut player = player(&config);
    let mut view = RecordingView::new();

    player.select_chapter(ch(1), &mut view);

    let cues = player.cues();
    assert_eq!(cues.len(), 3);
    assert_eq!(cues.get(1).unwrap().end().as_secs(), 2.0);
    assert_eq!(cues.get(2).unwrap().end().as_secs(), 7.0);

    player.seek(1.0, &mut view);
    let active = player.active_cue().unwrap();
    assert_eq!(player.cue_text(active.content()), "namo");
}

// === Configuration ===

#[test]
fn test_config_file_drives_player() {
    let (dir, _) = fixture(TRANSCRIPT, "text.html");
    let config_path: PathBuf = dir.path().join("recital.json");
    let transcript = dir.path().join("text.html");
    fs::write(
        &config_path,
        format!(
            r#"{{ "transcript": {:?}, "repeat_subsection": true, "volume": 4.0, "playback_rate": 2.0 }}"#,
            transcript.display().to_string()
        ),
    )
    .unwrap();

    let config = PlayerConfig::load(Path::new(&config_path)).unwrap();
    let player = player(&config);

    assert!(player.sync_state().repeat_subsection());
    assert_eq!(player.state().volume(), 1.0);
    assert_eq!(player.transport().volume(), 1.0);
    assert_eq!(player.transport().playback_rate(), 2.0);
}
