//! Loader Module
//!
//! Chapter content I/O:
//! - Chapter numbering and resource names
//! - Transcript sources (file, memory, HTTP)
//! - Chapter loads tagged with generation tickets

pub mod chapter;
pub mod chapter_loader;
pub mod source;
pub mod ticket;

#[cfg(feature = "async-loader")]
pub mod async_loader;

pub use chapter::{ChapterNumber, MAX_CHAPTER};
pub use chapter_loader::{ContentLoader, LoadOutcome, LoaderSettings, TranscriptFormat};
pub use source::{is_remote, FileSource, StaticSource, TranscriptSource};
pub use ticket::{GenerationCounter, LoadTicket};

#[cfg(feature = "http")]
pub use source::HttpSource;

#[cfg(feature = "async-loader")]
pub use async_loader::AsyncContentLoader;
