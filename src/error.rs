//! Error handling for Recital
//!
//! Nothing here is fatal: every variant degrades to "no cues / no highlight"
//! at the controller, which renders `friendly_message()` in place of the
//! transcript.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Recital operations
pub type Result<T> = std::result::Result<T, RecitalError>;

/// Main error type for Recital operations
#[derive(Error, Debug)]
pub enum RecitalError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Fetch Errors
    #[error("Failed to fetch transcript from {location}: {reason}")]
    FetchFailed { location: String, reason: String },

    #[error("Transcript fetch timed out after {timeout_ms}ms: {location}")]
    FetchTimeout { location: String, timeout_ms: u64 },

    // Transcript Errors
    #[error("Chapter {chapter} not found in transcript (looked for \"{key}\")")]
    ChapterNotFound { chapter: u16, key: String },

    #[error("Invalid transcript: {reason}")]
    InvalidTranscript { reason: String },

    // Playback Errors
    #[error("Chapter out of range: {chapter} (expected 1..={last})")]
    ChapterOutOfRange { chapter: i64, last: u16 },

    #[error("Media transport error: {reason}")]
    TransportError { reason: String },

    // Configuration Errors
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecitalError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RecitalError::FileNotFound { .. } => "FILE_NOT_FOUND",
            RecitalError::FileReadError { .. } => "FILE_READ_ERROR",
            RecitalError::FetchFailed { .. } => "FETCH_FAILED",
            RecitalError::FetchTimeout { .. } => "FETCH_TIMEOUT",
            RecitalError::ChapterNotFound { .. } => "CHAPTER_NOT_FOUND",
            RecitalError::InvalidTranscript { .. } => "INVALID_TRANSCRIPT",
            RecitalError::ChapterOutOfRange { .. } => "CHAPTER_OUT_OF_RANGE",
            RecitalError::TransportError { .. } => "TRANSPORT_ERROR",
            RecitalError::InvalidConfig { .. } => "INVALID_CONFIG",
            RecitalError::Io(_) => "IO_ERROR",
            RecitalError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the player usable with an empty cue store;
    /// the next successful load restores highlighting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            RecitalError::InvalidConfig { .. } | RecitalError::ChapterOutOfRange { .. }
        )
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            RecitalError::FileNotFound { path, .. } => {
                format!("Couldn't find '{}'. The text for this chapter is unavailable.", path.display())
            }
            RecitalError::FetchFailed { .. } | RecitalError::FetchTimeout { .. } => {
                "Error loading text. Playback continues without highlighting.".to_string()
            }
            RecitalError::ChapterNotFound { chapter, .. } => {
                format!("Text for chapter {} was not found in the transcript.", chapter)
            }
            RecitalError::InvalidTranscript { reason } => {
                format!("The transcript could not be read: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RecitalError::FileNotFound {
            path: PathBuf::from("narayaneeyam_text.html"),
            source: None,
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");

        let err = RecitalError::ChapterNotFound {
            chapter: 7,
            key: "Narayaneeyam D007".to_string(),
        };
        assert_eq!(err.error_code(), "CHAPTER_NOT_FOUND");
    }

    #[test]
    fn test_recoverability() {
        let fetch = RecitalError::FetchFailed {
            location: "http://localhost/text.html".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(fetch.is_recoverable());

        let config = RecitalError::InvalidConfig {
            field: "volume".to_string(),
            reason: "must be a number".to_string(),
        };
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_friendly_message_names_chapter() {
        let err = RecitalError::ChapterNotFound {
            chapter: 42,
            key: "Narayaneeyam D042".to_string(),
        };
        assert!(err.friendly_message().contains("chapter 42"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: RecitalError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
