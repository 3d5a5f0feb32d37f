/// ID types for podcast entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Episode identifier
///
/// Stable id assigned by the catalog. Two tracks with the same id are the same
/// episode. The empty string stands for a missing id.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(String);

impl EpisodeId {
    /// Create a new episode ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is missing (empty)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EpisodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EpisodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EpisodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
