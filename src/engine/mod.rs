//! Playback Engine Module
//!
//! Everything that runs on position ticks and user actions:
//! - Sync engine (position to active cue, sub-segment repeat)
//! - Playback controller (play/pause, chapters, end-of-media policy)
//! - Media transport seam and a simulated transport
//! - Presentation seams (highlight sink, transcript view)

pub mod controller;
pub mod sync;
pub mod transport;
pub mod view;

pub use controller::{EndAction, LoadStatus, PlaybackController, PlaybackState};
pub use sync::{SyncEngine, SyncState, TickOutcome, Transition};
pub use transport::{
    clamp_rate, clamp_volume, MediaTransport, SimulatedTransport, TransportState, MAX_PLAYBACK_RATE,
    MIN_PLAYBACK_RATE,
};
pub use view::{HighlightSink, RecordingView, TranscriptView, ViewEvent};
