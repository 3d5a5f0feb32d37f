//! Playback state types

use podcast_core::Track;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// No track loaded
    #[default]
    Idle,

    /// A new source is loading; duration not yet known
    Loading,

    /// Playing audio
    Playing,

    /// Paused mid-episode
    Paused,

    /// The episode played to its end
    Ended,
}

impl PlaybackPhase {
    /// Lowercase name, as exposed to JavaScript
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::Loading => "loading",
            PlaybackPhase::Playing => "playing",
            PlaybackPhase::Paused => "paused",
            PlaybackPhase::Ended => "ended",
        }
    }
}

/// Point-in-time copy of the observable player state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Loaded episode, `None` when idle
    pub current_track: Option<Track>,

    /// Playback intent
    pub is_playing: bool,

    /// Position in seconds
    pub current_time: f64,

    /// Source length in seconds, 0 while unknown
    pub duration: f64,

    /// Lifecycle phase
    pub phase: PlaybackPhase,
}
