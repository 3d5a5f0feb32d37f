/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The durable medium cannot be reached (no window, quota, private mode)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a read or write
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<StorageError> for podcast_core::PodcastError {
    fn from(err: StorageError) -> Self {
        podcast_core::PodcastError::storage(err.to_string())
    }
}
