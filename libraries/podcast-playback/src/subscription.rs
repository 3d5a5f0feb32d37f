//! Source subscriptions
//!
//! Every engine load gets a fresh, generation-stamped token. The engine tags
//! the events it emits for that load with the token, and the controller only
//! acts on events carrying the live one. Late callbacks from a superseded
//! source therefore cannot seek or overwrite the duration of the new one.

use podcast_core::EpisodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one engine load
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceToken {
    /// Monotonic load counter
    pub generation: u64,

    /// Episode the load belongs to
    pub episode_id: EpisodeId,
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.episode_id, self.generation)
    }
}

/// Tracks which source, if any, is live
#[derive(Debug, Default)]
pub struct SourceSubscriptions {
    next_generation: u64,
    live: Option<SourceToken>,
}

impl SourceSubscriptions {
    /// Create with no live source
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subscription for `episode_id`
    ///
    /// Returns the new live token and the token it superseded, which the
    /// caller must cancel with the engine.
    pub fn subscribe(&mut self, episode_id: EpisodeId) -> (SourceToken, Option<SourceToken>) {
        self.next_generation += 1;
        let token = SourceToken {
            generation: self.next_generation,
            episode_id,
        };
        let previous = self.live.replace(token.clone());
        (token, previous)
    }

    /// End the live subscription
    pub fn cancel(&mut self) -> Option<SourceToken> {
        self.live.take()
    }

    /// Whether events tagged with `token` should be acted on
    pub fn accepts(&self, token: &SourceToken) -> bool {
        self.live.as_ref() == Some(token)
    }

    /// The live token
    pub fn live(&self) -> Option<&SourceToken> {
        self.live.as_ref()
    }
}
