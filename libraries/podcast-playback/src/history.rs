//! Listening history façade
//!
//! The controller's narrow view of the shared progress store.

use podcast_core::{EpisodeId, ProgressRecord};
use podcast_storage::ProgressStore;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Read/write access to per-episode progress for the player
///
/// Cloning shares the underlying store.
#[derive(Clone)]
pub struct HistoryFacade {
    store: Rc<dyn ProgressStore>,
}

impl HistoryFacade {
    /// Wrap a shared store
    pub fn new(store: Rc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Record the position of an episode
    pub fn update_progress(&self, episode_id: &EpisodeId, progress: f64, duration: f64) {
        self.store.update_progress(episode_id, progress, duration);
    }

    /// Position and completion of an episode (zero record if unseen)
    pub fn get_progress(&self, episode_id: &EpisodeId) -> ProgressRecord {
        self.store.get_progress(episode_id)
    }

    /// Forget all progress
    pub fn reset_history(&self) {
        self.store.reset_history();
    }

    /// Every stored record
    pub fn history(&self) -> BTreeMap<EpisodeId, ProgressRecord> {
        self.store.history()
    }

    /// Most recently listened episodes first
    pub fn recently_played(&self, limit: usize) -> Vec<(EpisodeId, ProgressRecord)> {
        self.store.recently_played(limit)
    }

    /// The shared store, for read-only "resume" indicators elsewhere
    pub fn store(&self) -> Rc<dyn ProgressStore> {
        Rc::clone(&self.store)
    }
}

impl fmt::Debug for HistoryFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryFacade").finish_non_exhaustive()
    }
}
