//! Transcript sources
//!
//! A source hands back the whole transcript document. The loader fetches it
//! afresh for every chapter load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{RecitalError, Result};

/// Where a transcript document comes from
pub trait TranscriptSource {
    /// Fetch the full document text
    fn fetch(&self) -> Result<String>;

    /// Human-readable location for logs and errors
    fn location(&self) -> String;
}

impl<T: TranscriptSource + ?Sized> TranscriptSource for Box<T> {
    fn fetch(&self) -> Result<String> {
        (**self).fetch()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Transcript read from the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptSource for FileSource {
    fn fetch(&self) -> Result<String> {
        debug!("Reading transcript {}", self.path.display());
        fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecitalError::FileNotFound {
                path: self.path.clone(),
                source: Some(e),
            },
            _ => RecitalError::FileReadError {
                path: self.path.clone(),
                source: e,
            },
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Transcript held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TranscriptSource for StaticSource {
    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// Transcript fetched over HTTP(S)
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    timeout_ms: u64,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            timeout_ms,
        }
    }
}

#[cfg(feature = "http")]
impl TranscriptSource for HttpSource {
    fn fetch(&self) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| RecitalError::FetchFailed {
                location: self.url.clone(),
                reason: e.to_string(),
            })?;

        debug!("Fetching transcript {}", self.url);
        let response = client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                RecitalError::FetchTimeout {
                    location: self.url.clone(),
                    timeout_ms: self.timeout_ms,
                }
            } else {
                RecitalError::FetchFailed {
                    location: self.url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(RecitalError::FetchFailed {
                location: self.url.clone(),
                reason: format!("server returned {}", response.status()),
            });
        }

        response.text().map_err(|e| RecitalError::FetchFailed {
            location: self.url.clone(),
            reason: e.to_string(),
        })
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// True for `http://` and `https://` locations
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_file_source_reads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("text.html");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "<html></html>").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().unwrap(), "<html></html>");
        assert_eq!(source.location(), path.display().to_string());
    }

    #[test]
    fn test_file_source_missing() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.html"));
        assert_eq!(source.fetch().unwrap_err().error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_boxed_source() {
        let source: Box<dyn TranscriptSource> = Box::new(StaticSource::new("abc"));
        assert_eq!(source.fetch().unwrap(), "abc");
        assert_eq!(source.location(), "<memory>");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/text.html"));
        assert!(is_remote(" HTTP://host/x"));
        assert!(!is_remote("narayaneeyam_text.html"));
    }
}
