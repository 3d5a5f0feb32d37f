//! Podcast Player Storage
//!
//! Durable per-episode listening progress.
//!
//! This crate persists one mapping, `episodeId → {progress, finished, timestamp}`,
//! as a single JSON document under one key of a key/value medium.
//!
//! # Architecture
//!
//! - **`ProgressStore`**: the narrow read/write interface the playback
//!   controller and "resume" indicators depend on
//! - **`KeyValueBackend`**: the durable medium (memory, files, browser
//!   `localStorage`)
//! - **Best-effort persistence**: unreadable data loads as empty, failed
//!   writes are logged and never roll back the in-memory mapping
//!
//! # Example
//!
//! ```rust
//! use podcast_storage::{MemoryBackend, PersistentProgressStore, ProgressStore};
//! use podcast_core::EpisodeId;
//!
//! let store = PersistentProgressStore::open(MemoryBackend::new(), "podcastListeningHistory");
//! let id = EpisodeId::new("ep-1");
//!
//! store.update_progress(&id, 120.0, 300.0);
//! assert_eq!(store.get_progress(&id).progress, 120.0);
//! assert!(!store.get_progress(&id).finished);
//! ```

mod backend;
mod clock;
mod error;
mod progress;

#[cfg(feature = "wasm")]
mod local_storage;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StorageError};
pub use progress::{PersistentProgressStore, ProgressStore, HISTORY_STORAGE_KEY};

#[cfg(feature = "wasm")]
pub use local_storage::LocalStorageBackend;
