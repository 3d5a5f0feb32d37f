//! Player Events
//!
//! Notifications the controller accumulates for the UI. The host drains
//! them after each operation with `drain_events()`:
//! - State changes (phase or play intent)
//! - Track changes
//! - Position updates (optionally throttled)
//! - Resume from stored progress, saved progress, finished episodes
//! - Engine errors that did not stop the controls

use crate::types::PlaybackPhase;
use podcast_core::EpisodeId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlayerEvent {
    /// Phase or play intent changed
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
        /// The new play intent
        is_playing: bool,
    },

    /// A different episode was loaded
    TrackChanged {
        /// The new episode
        episode_id: EpisodeId,
        /// The episode it replaced, if any
        previous_episode_id: Option<EpisodeId>,
    },

    /// Playback position changed
    PositionUpdate {
        /// Position in seconds
        current_time: f64,
        /// Source length in seconds
        duration: f64,
    },

    /// Playback jumped to the stored position of the episode
    ResumedFromHistory {
        /// The resumed episode
        episode_id: EpisodeId,
        /// Position resumed at, in seconds
        position: f64,
    },

    /// Current position was written to the progress store
    ProgressSaved {
        /// The saved episode
        episode_id: EpisodeId,
        /// Saved position in seconds
        progress: f64,
        /// Whether the episode now counts as finished
        finished: bool,
    },

    /// The episode played to its end
    TrackFinished {
        /// The finished episode
        episode_id: EpisodeId,
    },

    /// The engine reported a failure; controls keep working
    Error {
        /// Error message
        message: String,
    },
}
