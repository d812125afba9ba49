//! Load generations
//!
//! Every chapter load is tagged with a generation number. Starting a new
//! load supersedes all earlier ones; a result whose ticket is no longer
//! current is dropped without touching player state.

use super::chapter::ChapterNumber;

/// Identifies one chapter load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    chapter: ChapterNumber,
    generation: u64,
}

impl LoadTicket {
    pub fn chapter(&self) -> ChapterNumber {
        self.chapter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues tickets and tells current ones from stale ones
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding every earlier ticket
    pub fn issue(&mut self, chapter: ChapterNumber) -> LoadTicket {
        self.current += 1;
        LoadTicket {
            chapter,
            generation: self.current,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}
