//! Error types for the voxlate pipeline

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for voxlate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Recording device or fallback synthesis failure
    #[error("capture failed: {0}")]
    Capture(String),

    /// Local I/O failure reading an audio artifact before upload
    #[error("failed to read audio for upload: {0}")]
    Upload(#[source] std::io::Error),

    /// Remote service returned a non-success response or was unreachable
    #[error("service error: {0}")]
    Service(String),

    /// Remote call exceeded its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Playback utility or audio library failure
    #[error("playback failed: {0}")]
    Playback(String),

    /// Audio artifact missing or unreadable
    #[error("audio artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Channel to a pipeline task closed unexpectedly
    #[error("channel error: {0}")]
    Channel(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Coarse classification used for the session's error record
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Capture(_) => ErrorKind::Capture,
            Self::Upload(_) => ErrorKind::Upload,
            Self::Service(_) => ErrorKind::Service,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Playback(_) => ErrorKind::Playback,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Channel(_) => ErrorKind::Channel,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Error classification, independent of the carried detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Capture,
    Upload,
    Service,
    Timeout,
    Playback,
    NotFound,
    Channel,
    Io,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            Error::Timeout(Duration::from_secs(60)).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            Error::Service("500".to_string()).kind(),
            ErrorKind::Service
        );
        assert_eq!(
            Error::NotFound(PathBuf::from("/tmp/missing.wav")).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn display_includes_detail() {
        let err = Error::Capture("arecord exited with code 1".to_string());
        assert!(err.to_string().contains("arecord exited"));
    }
}
