/// Track domain type
use crate::error::{PodcastError, Result};
use crate::types::EpisodeId;
use serde::{Deserialize, Serialize};

/// An episode queued for playback
///
/// Built by the catalog when the user picks an episode and handed to the
/// playback controller, which replaces (never mutates) its current track.
/// Field names follow the catalog's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique episode identifier
    pub id: EpisodeId,

    /// Episode title
    #[serde(default)]
    pub title: String,

    /// Title of the show the episode belongs to
    #[serde(default)]
    pub show_title: String,

    /// Cover image URL of the show
    #[serde(default)]
    pub show_image: String,

    /// Media URL the engine loads
    pub file: String,

    /// Episode number within its season
    #[serde(default)]
    pub episode_number: u32,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: impl Into<EpisodeId>,
        title: impl Into<String>,
        show_title: impl Into<String>,
        show_image: impl Into<String>,
        file: impl Into<String>,
        episode_number: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            show_title: show_title.into(),
            show_image: show_image.into(),
            file: file.into(),
            episode_number,
        }
    }

    /// Check the fields playback relies on
    ///
    /// A track needs an id to key its progress and a media URL to load.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PodcastError::invalid_input("track id is empty"));
        }
        if self.file.trim().is_empty() {
            return Err(PodcastError::invalid_input(format!(
                "track {} has no media URL",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether both tracks refer to the same episode
    pub fn is_same_episode(&self, other: &Track) -> bool {
        self.id == other.id
    }
}
