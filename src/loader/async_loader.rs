//! Background chapter loads on tokio's blocking pool
//!
//! The fetch and parse run off the event loop; the result comes back with
//! its ticket so the controller can drop it if a newer load has started.

use std::sync::Arc;

use log::warn;

use super::chapter_loader::{ContentLoader, LoadOutcome};
use super::source::TranscriptSource;
use super::ticket::LoadTicket;
use crate::error::RecitalError;

/// Shares a [`ContentLoader`] with blocking worker tasks
pub struct AsyncContentLoader<S> {
    inner: Arc<ContentLoader<S>>,
}

impl<S> Clone for AsyncContentLoader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> AsyncContentLoader<S>
where
    S: TranscriptSource + Send + Sync + 'static,
{
    pub fn new(loader: ContentLoader<S>) -> Self {
        Self {
            inner: Arc::new(loader),
        }
    }

    /// Load the ticket's chapter without blocking the caller
    pub async fn load(&self, ticket: LoadTicket) -> (LoadTicket, LoadOutcome) {
        let inner = Arc::clone(&self.inner);
        let chapter = ticket.chapter();

        match tokio::task::spawn_blocking(move || inner.load(chapter)).await {
            Ok(outcome) => (ticket, outcome),
            Err(e) => {
                warn!("Load task for chapter {} failed: {}", chapter, e);
                let outcome = LoadOutcome {
                    chapter,
                    audio: self.inner.audio_path(chapter),
                    transcript: Err(RecitalError::FetchFailed {
                        location: self.inner.source().location(),
                        reason: e.to_string(),
                    }),
                };
                (ticket, outcome)
            }
        }
    }
}
