//! Media transport seam
//!
//! The real media element lives outside this crate. [`MediaTransport`] is
//! the contract the playback controller drives, and [`SimulatedTransport`]
//! is an in-process implementation with a wall-clock-free playhead, used by
//! the CLI simulator and by tests.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{RecitalError, Result};

/// Slowest playback rate a transport accepts
pub const MIN_PLAYBACK_RATE: f64 = 0.0625;
/// Fastest playback rate a transport accepts
pub const MAX_PLAYBACK_RATE: f64 = 16.0;

/// Clamp a requested rate into the accepted range; `None` for non-numbers
pub fn clamp_rate(rate: f64) -> Option<f64> {
    if rate.is_nan() {
        None
    } else {
        Some(rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE))
    }
}

/// Clamp a requested volume into `0..=1`; `None` for non-numbers
pub fn clamp_volume(volume: f64) -> Option<f64> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

/// What the playback controller needs from a media element
///
/// `is_playing` is the source of truth: a `play()` may be refused (autoplay
/// policy, missing media) and the controller reads back the real state.
pub trait MediaTransport {
    /// Point the transport at a new media resource, rewinding to 0
    fn load(&mut self, source: &Path) -> Result<()>;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;

    /// Move the playhead (seconds, clamped to >= 0)
    fn seek(&mut self, position: f64);

    /// Current playhead position in seconds
    fn position(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    fn set_volume(&mut self, volume: f64);
}

/// Transport states representing the current playback mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Transport is paused (default state)
    #[default]
    Paused,
    /// Audio is actively playing
    Playing,
    /// Playhead reached the end of the media
    Ended,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Paused => write!(f, "Paused"),
            TransportState::Playing => write!(f, "Playing"),
            TransportState::Ended => write!(f, "Ended"),
        }
    }
}

/// In-process transport with a manually advanced playhead
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    /// Current transport state
    state: TransportState,

    /// Current playhead position in seconds
    position: f64,

    /// Media length; `None` never ends
    duration: Option<f64>,

    playback_rate: f64,

    volume: f64,

    /// Currently loaded media
    source: Option<PathBuf>,

    /// Refuse `play()` like a browser blocking autoplay
    block_play: bool,

    /// Refuse `load()` like a missing media file
    fail_loads: bool,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    /// Create a paused transport with no media and no duration
    ///
    /// # Example
    /// ```
    /// use recital::engine::{MediaTransport, SimulatedTransport};
    /// let transport = SimulatedTransport::new();
    /// assert!(!transport.is_playing());
    /// assert_eq!(transport.position(), 0.0);
    /// ```
    pub fn new() -> Self {
        Self {
            state: TransportState::Paused,
            position: 0.0,
            duration: None,
            playback_rate: 1.0,
            volume: 1.0,
            source: None,
            block_play: false,
            fail_loads: false,
        }
    }

    /// Create a transport whose media lasts `duration` seconds
    pub fn with_duration(duration: f64) -> Self {
        let mut transport = Self::new();
        transport.set_duration(Some(duration));
        transport
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == TransportState::Ended
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Make subsequent `play()` calls fail silently
    pub fn set_block_play(&mut self, blocked: bool) {
        self.block_play = blocked;
    }

    /// Make subsequent `load()` calls fail
    pub fn set_fail_loads(&mut self, fail: bool) {
        self.fail_loads = fail;
    }

    /// Move the playhead forward by `elapsed` seconds of wall time
    ///
    /// Scaled by the playback rate. Only moves while playing. Returns `true`
    /// when this advance reached the end of the media.
    ///
    /// # Example
    /// ```
    /// use recital::engine::{MediaTransport, SimulatedTransport};
    /// let mut transport = SimulatedTransport::with_duration(2.0);
    /// transport.play();
    /// assert!(!transport.advance(1.0));
    /// assert!(transport.advance(1.5));
    /// assert!(!transport.is_playing());
    /// ```
    pub fn advance(&mut self, elapsed: f64) -> bool {
        if self.state != TransportState::Playing || !(elapsed.is_finite() && elapsed > 0.0) {
            return false;
        }

        self.position += elapsed * self.playback_rate;

        match self.duration {
            Some(duration) if self.position >= duration => {
                self.position = duration;
                self.state = TransportState::Ended;
                debug!("[TRANSPORT] Ended at {:.3}s", duration);
                true
            }
            _ => false,
        }
    }
}

impl MediaTransport for SimulatedTransport {
    fn load(&mut self, source: &Path) -> Result<()> {
        self.state = TransportState::Paused;
        self.position = 0.0;

        if self.fail_loads {
            self.source = None;
            return Err(RecitalError::TransportError {
                reason: format!("cannot load {}", source.display()),
            });
        }

        debug!("[TRANSPORT] Loaded {}", source.display());
        self.source = Some(source.to_path_buf());
        Ok(())
    }

    fn play(&mut self) {
        if self.block_play {
            warn!("[TRANSPORT] Play refused");
            return;
        }
        match self.state {
            TransportState::Paused => {
                self.state = TransportState::Playing;
                debug!("[TRANSPORT] Play from {:.3}s", self.position);
            }
            TransportState::Ended => {
                // Playing an ended element restarts it
                self.position = 0.0;
                self.state = TransportState::Playing;
                debug!("[TRANSPORT] Restart from 0");
            }
            TransportState::Playing => {
                debug!("[TRANSPORT] Already playing");
            }
        }
    }

    fn pause(&mut self) {
        match self.state {
            TransportState::Playing => {
                self.state = TransportState::Paused;
                debug!("[TRANSPORT] Paused at {:.3}s", self.position);
            }
            TransportState::Paused | TransportState::Ended => {
                debug!("[TRANSPORT] Already paused");
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    fn seek(&mut self, position: f64) {
        if !position.is_finite() {
            warn!("[TRANSPORT] Ignoring seek to {}", position);
            return;
        }
        let mut target = position.max(0.0);
        if let Some(duration) = self.duration {
            target = target.min(duration);
        }
        self.position = target;
        if self.state == TransportState::Ended && self.duration.map_or(true, |d| target < d) {
            self.state = TransportState::Paused;
        }
        debug!("[TRANSPORT] Seek to {:.3}s", self.position);
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if let Some(rate) = clamp_rate(rate) {
            self.playback_rate = rate;
        }
    }

    fn set_volume(&mut self, volume: f64) {
        if let Some(volume) = clamp_volume(volume) {
            self.volume = volume;
        }
    }
}
