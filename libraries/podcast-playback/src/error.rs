//! Error types for playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media engine refused a command (autoplay policy, decode failure)
    #[error("Audio engine error: {0}")]
    Engine(String),

    /// A track handed to the player is unusable
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Settings could not be loaded or are out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Log subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),

    /// Host environment integration failed (DOM listeners, window access)
    #[error("Host error: {0}")]
    Host(String),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] podcast_storage::StorageError),
}

impl PlaybackError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a host error
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

impl From<podcast_core::PodcastError> for PlaybackError {
    fn from(err: podcast_core::PodcastError) -> Self {
        match err {
            podcast_core::PodcastError::InvalidInput(msg) => Self::InvalidTrack(msg),
            other => Self::Engine(other.to_string()),
        }
    }
}

impl From<PlaybackError> for podcast_core::PodcastError {
    fn from(err: PlaybackError) -> Self {
        podcast_core::PodcastError::playback(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
