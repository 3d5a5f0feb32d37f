//! Per-episode listening progress persisted as one JSON mapping

use crate::backend::KeyValueBackend;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use podcast_core::{EpisodeId, ProgressRecord};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Default key the progress mapping is stored under
pub const HISTORY_STORAGE_KEY: &str = "podcastListeningHistory";

/// Read/write access to listening progress
///
/// Methods take `&self` so one store can be shared (`Rc<dyn ProgressStore>`)
/// between the playback controller and read-only "resume" indicators.
pub trait ProgressStore {
    /// Record `progress` seconds out of `duration` for `episode_id`
    ///
    /// An empty id is ignored. `finished` is derived from the ratio and the
    /// timestamp is taken from the store's clock.
    fn update_progress(&self, episode_id: &EpisodeId, progress: f64, duration: f64);

    /// Stored record, or the zero record for unseen episodes
    fn get_progress(&self, episode_id: &EpisodeId) -> ProgressRecord;

    /// Forget every record
    fn reset_history(&self);

    /// Snapshot of the whole mapping
    fn history(&self) -> BTreeMap<EpisodeId, ProgressRecord>;

    /// Up to `limit` episodes, most recently written first
    fn recently_played(&self, limit: usize) -> Vec<(EpisodeId, ProgressRecord)> {
        let mut entries: Vec<_> = self.history().into_iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| {
            b.timestamp.cmp(&a.timestamp).then_with(|| a_id.cmp(b_id))
        });
        entries.truncate(limit);
        entries
    }
}

/// `ProgressStore` backed by a `KeyValueBackend`
///
/// The mapping is read once when the store is opened and then served from
/// memory. Every write re-serializes the whole mapping under a single key.
/// Persistence is best effort: the in-memory mapping is the source of truth
/// for the rest of the session even when the backend rejects a write.
pub struct PersistentProgressStore<B: KeyValueBackend> {
    backend: B,
    key: String,
    clock: Rc<dyn Clock>,
    records: RefCell<BTreeMap<EpisodeId, ProgressRecord>>,
}

impl<B: KeyValueBackend> PersistentProgressStore<B> {
    /// Open the mapping stored under `key`
    ///
    /// A missing key, an unreadable backend or an unparsable payload all
    /// yield an empty mapping.
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        Self::open_with_clock(backend, key, Rc::new(SystemClock))
    }

    /// Open with an explicit clock for record timestamps
    pub fn open_with_clock(backend: B, key: impl Into<String>, clock: Rc<dyn Clock>) -> Self {
        let key = key.into();
        let records = load_records(&backend, &key);
        debug!(key = %key, records = records.len(), "Loaded listening history");

        Self {
            backend,
            key,
            clock,
            records: RefCell::new(records),
        }
    }

    /// Storage key of the mapping
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of episodes with a record
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether no episode has a record
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&*self.records.borrow())?;
        self.backend.set(&self.key, &payload)
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            error!(key = %self.key, error = %e, "Failed to persist listening history");
        }
    }
}

impl<B: KeyValueBackend> ProgressStore for PersistentProgressStore<B> {
    fn update_progress(&self, episode_id: &EpisodeId, progress: f64, duration: f64) {
        if episode_id.is_empty() {
            debug!("Ignoring progress update without an episode id");
            return;
        }

        let record = ProgressRecord::from_position(progress, duration, self.clock.now_millis());
        debug!(
            episode = %episode_id,
            progress = record.progress,
            finished = record.finished,
            "Recording progress"
        );
        self.records
            .borrow_mut()
            .insert(episode_id.clone(), record);

        self.persist_or_log();
    }

    fn get_progress(&self, episode_id: &EpisodeId) -> ProgressRecord {
        self.records
            .borrow()
            .get(episode_id)
            .copied()
            .unwrap_or_default()
    }

    fn reset_history(&self) {
        self.records.borrow_mut().clear();
        self.persist_or_log();
        debug!(key = %self.key, "Listening history reset");
    }

    fn history(&self) -> BTreeMap<EpisodeId, ProgressRecord> {
        self.records.borrow().clone()
    }
}

fn load_records<B: KeyValueBackend>(
    backend: &B,
    key: &str,
) -> BTreeMap<EpisodeId, ProgressRecord> {
    let payload = match backend.get(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "Listening history unreadable, starting empty");
            return BTreeMap::new();
        }
    };

    let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&payload) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(key = %key, error = %e, "Listening history corrupted, starting empty");
            return BTreeMap::new();
        }
    };

    // A bad record only costs its own episode
    entries
        .into_iter()
        .filter_map(|(id, value)| match serde_json::from_value::<ProgressRecord>(value) {
            Ok(record) => Some((EpisodeId::new(id), record)),
            Err(e) => {
                warn!(key = %key, episode = %id, error = %e, "Skipping unreadable progress record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::clock::ManualClock;

    fn store_at(now: i64) -> (PersistentProgressStore<MemoryBackend>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(now));
        let store = PersistentProgressStore::open_with_clock(
            MemoryBackend::new(),
            HISTORY_STORAGE_KEY,
            clock.clone(),
        );
        (store, clock)
    }

    #[test]
    fn unseen_episode_reads_zero_record() {
        let (store, _) = store_at(0);
        assert_eq!(
            store.get_progress(&EpisodeId::new("nope")),
            ProgressRecord::default()
        );
    }

    #[test]
    fn update_stamps_clock_time() {
        let (store, _) = store_at(1_700_000_000_000);
        let id = EpisodeId::new("ep");
        store.update_progress(&id, 30.0, 100.0);

        let record = store.get_progress(&id);
        assert_eq!(record.progress, 30.0);
        assert!(!record.finished);
        assert_eq!(record.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn empty_id_is_ignored() {
        let (store, _) = store_at(0);
        store.update_progress(&EpisodeId::default(), 30.0, 100.0);
        assert!(store.is_empty());
        assert_eq!(store.backend().get(HISTORY_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn persisted_layout_is_keyed_by_episode() {
        let (store, _) = store_at(5);
        store.update_progress(&EpisodeId::new("ep-1"), 98.0, 100.0);

        let payload = store.backend().get(HISTORY_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ep-1": { "progress": 98.0, "finished": true, "timestamp": 5 }
            })
        );
    }

    #[test]
    fn reopen_reads_previous_mapping() {
        let (store, _) = store_at(9);
        store.update_progress(&EpisodeId::new("ep-1"), 12.5, 60.0);
        let payload = store.backend().get(HISTORY_STORAGE_KEY).unwrap().unwrap();

        let reopened = PersistentProgressStore::open(
            MemoryBackend::with_entry(HISTORY_STORAGE_KEY, payload),
            HISTORY_STORAGE_KEY,
        );
        let record = reopened.get_progress(&EpisodeId::new("ep-1"));
        assert_eq!(record.progress, 12.5);
        assert_eq!(record.timestamp, 9);
    }

    #[test]
    fn recently_played_orders_by_timestamp() {
        let (store, clock) = store_at(100);
        store.update_progress(&EpisodeId::new("a"), 1.0, 10.0);
        clock.advance(10);
        store.update_progress(&EpisodeId::new("b"), 1.0, 10.0);
        clock.advance(10);
        store.update_progress(&EpisodeId::new("c"), 1.0, 10.0);
        clock.advance(10);
        store.update_progress(&EpisodeId::new("a"), 2.0, 10.0);

        let ids: Vec<_> = store
            .recently_played(3)
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(store.recently_played(1).len(), 1);
    }
}
