//! Playback Controller
//!
//! Owns the player-level state and policy:
//! - play/pause, always read back from the transport
//! - rate and volume, clamped and forwarded
//! - chapter selection through the content loader, guarded by load tickets
//! - end-of-media policy: repeat the chapter, advance, or stop
//!
//! Everything runs on the caller's thread. Position ticks, user actions and
//! load completions are plain method calls, so a completion can never land
//! halfway through a tick.

use log::{debug, info, warn};

use super::sync::{SyncEngine, SyncState, TickOutcome, Transition};
use super::transport::{clamp_rate, clamp_volume, MediaTransport};
use super::view::TranscriptView;
use crate::config::PlayerConfig;
use crate::cues::{ChapterTranscript, ContentId, Cue, CueStore, TranscriptSection};
use crate::loader::{ChapterNumber, ContentLoader, GenerationCounter, LoadOutcome, LoadTicket, TranscriptSource};

/// Player state, mutated only by [`PlaybackController`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    is_playing: bool,
    repeat_chapter: bool,
    current_chapter: ChapterNumber,
    playback_rate: f64,
    volume: f64,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn repeat_chapter(&self) -> bool {
        self.repeat_chapter
    }

    pub fn current_chapter(&self) -> ChapterNumber {
        self.current_chapter
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Content became the current chapter
    Installed,
    /// A newer load was started; the result was dropped
    Stale,
}

/// Reaction to the end of the media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Chapter repeat restarted from 0
    RestartedChapter,
    /// Moved on to the next chapter
    Advanced(LoadStatus),
    /// Last chapter done; playback stopped
    Finished,
}

/// Drives a [`MediaTransport`] and a [`SyncEngine`] for one player
pub struct PlaybackController<T, S> {
    transport: T,
    loader: ContentLoader<S>,
    engine: SyncEngine,
    state: PlaybackState,
    section: TranscriptSection,
    last_chapter: ChapterNumber,
    generations: GenerationCounter,
}

impl<T: MediaTransport, S: TranscriptSource> PlaybackController<T, S> {
    /// Build a controller with settings from `config`
    ///
    /// Nothing is loaded yet; call [`select_chapter`](Self::select_chapter).
    pub fn new(mut transport: T, loader: ContentLoader<S>, config: &PlayerConfig) -> Self {
        let playback_rate = clamp_rate(config.playback_rate).unwrap_or(1.0);
        let volume = clamp_volume(config.volume).unwrap_or(1.0);
        transport.set_playback_rate(playback_rate);
        transport.set_volume(volume);

        let mut engine = SyncEngine::new();
        engine.set_repeat_subsection(config.repeat_subsection);

        Self {
            state: PlaybackState {
                is_playing: transport.is_playing(),
                repeat_chapter: config.repeat_chapter,
                current_chapter: ChapterNumber::FIRST,
                playback_rate,
                volume,
            },
            transport,
            loader,
            engine,
            section: TranscriptSection::default(),
            last_chapter: config.last_chapter(),
            generations: GenerationCounter::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn sync_state(&self) -> SyncState {
        self.engine.state()
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Direct transport access for hosts that feed it media events
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn loader(&self) -> &ContentLoader<S> {
        &self.loader
    }

    /// Text of the installed chapter
    pub fn section(&self) -> &TranscriptSection {
        &self.section
    }

    /// Cues of the installed chapter
    pub fn cues(&self) -> &CueStore {
        self.engine.store()
    }

    /// Text a cue of the installed chapter points at
    pub fn cue_text(&self, id: ContentId) -> &str {
        self.section.text(id)
    }

    pub fn active_cue(&self) -> Option<&Cue> {
        self.engine.active_cue()
    }

    pub fn last_chapter(&self) -> ChapterNumber {
        self.last_chapter
    }

    // ------------------------------------------------------------------------
    // Transport controls
    // ------------------------------------------------------------------------

    pub fn play(&mut self) -> bool {
        self.transport.play();
        self.state.is_playing = self.transport.is_playing();
        if !self.state.is_playing {
            warn!("[TRANSPORT] Play request was not honoured");
        }
        self.state.is_playing
    }

    pub fn pause(&mut self) {
        self.transport.pause();
        self.state.is_playing = self.transport.is_playing();
    }

    /// Flip play/pause based on what the transport reports; returns the new state
    pub fn toggle_play_pause(&mut self) -> bool {
        if self.transport.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.state.is_playing
    }

    pub fn set_repeat_chapter(&mut self, enabled: bool) {
        debug!("Chapter repeat {}", if enabled { "on" } else { "off" });
        self.state.repeat_chapter = enabled;
    }

    pub fn toggle_repeat_chapter(&mut self) -> bool {
        self.set_repeat_chapter(!self.state.repeat_chapter);
        self.state.repeat_chapter
    }

    pub fn set_repeat_subsection(&mut self, enabled: bool) {
        self.engine.set_repeat_subsection(enabled);
    }

    pub fn toggle_repeat_subsection(&mut self) -> bool {
        let enabled = !self.engine.repeat_subsection();
        self.engine.set_repeat_subsection(enabled);
        enabled
    }

    /// Clamp and forward a playback rate; NaN is ignored
    pub fn set_playback_rate(&mut self, rate: f64) {
        match clamp_rate(rate) {
            Some(rate) => {
                self.state.playback_rate = rate;
                self.transport.set_playback_rate(rate);
            }
            None => warn!("Ignoring playback rate {}", rate),
        }
    }

    /// Clamp and forward a volume; NaN is ignored
    pub fn set_volume(&mut self, volume: f64) {
        match clamp_volume(volume) {
            Some(volume) => {
                self.state.volume = volume;
                self.transport.set_volume(volume);
            }
            None => warn!("Ignoring volume {}", volume),
        }
    }

    // ------------------------------------------------------------------------
    // Chapter loading
    // ------------------------------------------------------------------------

    /// Start a load; any earlier ticket becomes stale
    pub fn begin_load(&mut self, chapter: ChapterNumber) -> LoadTicket {
        let ticket = self.generations.issue(chapter);
        debug!("Load of chapter {} issued as generation {}", chapter, ticket.generation());
        ticket
    }

    /// Install a finished load if its ticket is still current
    ///
    /// The old highlight is cleared and the new store installed before the
    /// transport sees the new audio, so the first tick after this call is
    /// judged against the new chapter only. A failed transcript installs an
    /// empty store and shows the error; playback of the audio continues.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
        view: &mut dyn TranscriptView,
    ) -> LoadStatus {
        if !self.generations.is_current(&ticket) {
            debug!(
                "Dropping stale load of chapter {} (generation {}, current {})",
                ticket.chapter(),
                ticket.generation(),
                self.generations.current()
            );
            return LoadStatus::Stale;
        }

        let chapter = ticket.chapter();
        let resume = self.state.is_playing;

        let (ChapterTranscript { section, cues }, failure) = match outcome.transcript {
            Ok(transcript) => (transcript, None),
            Err(e) => (ChapterTranscript::default(), Some(e)),
        };

        self.engine.install(cues, view);
        self.section = section;
        self.state.current_chapter = chapter;

        match failure {
            None => view.show_transcript(chapter, &self.section, self.engine.store()),
            Some(e) => view.show_error(chapter, &e.friendly_message()),
        }

        if let Err(e) = self.transport.load(&outcome.audio) {
            warn!("[TRANSPORT] {}", e);
            view.show_error(chapter, &e.friendly_message());
        }

        if resume {
            self.transport.play();
        }
        self.state.is_playing = self.transport.is_playing();
        info!(
            "{} ready ({} cues, {})",
            chapter.label(),
            self.engine.store().len(),
            if self.state.is_playing { "playing" } else { "paused" }
        );

        self.on_time_update(view);
        LoadStatus::Installed
    }

    /// Load and install a chapter synchronously
    pub fn select_chapter(&mut self, chapter: ChapterNumber, view: &mut dyn TranscriptView) -> LoadStatus {
        let ticket = self.begin_load(chapter);
        let outcome = self.loader.load(chapter);
        self.finish_load(ticket, outcome, view)
    }

    /// `None` when already at the last chapter
    pub fn next_chapter(&mut self, view: &mut dyn TranscriptView) -> Option<LoadStatus> {
        let next = self.state.current_chapter.next(self.last_chapter)?;
        Some(self.select_chapter(next, view))
    }

    /// `None` when already at the first chapter
    pub fn previous_chapter(&mut self, view: &mut dyn TranscriptView) -> Option<LoadStatus> {
        let previous = self.state.current_chapter.prev()?;
        Some(self.select_chapter(previous, view))
    }

    // ------------------------------------------------------------------------
    // Media events
    // ------------------------------------------------------------------------

    /// Position tick from the transport
    ///
    /// A repeat seek is re-evaluated at the transport's new position right
    /// away. If a transport has not landed the seek by then, the returned
    /// `seek_to` still stands and the next tick requests it again.
    pub fn on_time_update(&mut self, view: &mut dyn TranscriptView) -> TickOutcome {
        let outcome = self.engine.on_tick(self.transport.position(), view);
        if let Some(target) = outcome.seek_to {
            self.transport.seek(target.as_secs());
            // The transport does not tick on seek; evaluate where it landed
            self.engine.on_tick(self.transport.position(), view);
        }
        outcome
    }

    /// User moved the playhead
    pub fn seek(&mut self, position: f64, view: &mut dyn TranscriptView) -> Transition {
        self.transport.seek(position);
        self.engine.reposition(self.transport.position(), view)
    }

    /// The transport reached the end of the media
    pub fn on_media_ended(&mut self, view: &mut dyn TranscriptView) -> EndAction {
        if self.state.repeat_chapter {
            info!("Repeating {}", self.state.current_chapter.label());
            self.transport.seek(0.0);
            self.play();
            self.engine.reposition(self.transport.position(), view);
            return EndAction::RestartedChapter;
        }

        match self.state.current_chapter.next(self.last_chapter) {
            Some(next) => {
                info!("Advancing to {}", next.label());
                self.state.is_playing = true;
                EndAction::Advanced(self.select_chapter(next, view))
            }
            None => {
                info!("Finished {}", self.state.current_chapter.label());
                self.transport.pause();
                self.state.is_playing = false;
                self.engine.clear(view);
                view.show_stopped();
                EndAction::Finished
            }
        }
    }
}
