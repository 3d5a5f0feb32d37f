/// Core error types for the podcast player
use thiserror::Error;

/// Result type alias using `PodcastError`
pub type Result<T> = std::result::Result<T, PodcastError>;

/// Core error type for the podcast player
#[derive(Error, Debug)]
pub enum PodcastError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Playback engine errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PodcastError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
