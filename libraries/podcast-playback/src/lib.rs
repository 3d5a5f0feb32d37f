//! Podcast Player - Playback & Progress Synchronization
//!
//! Platform-agnostic control of the single global audio player.
//!
//! This crate provides:
//! - Play / pause / seek over one active episode
//! - Resume from the stored position when a source becomes ready
//! - Progress saving on pause, track switch, page hide, unload and teardown
//! - Completion tracking (98% rule) when an episode ends
//! - Stale-callback protection through generation-stamped source tokens
//! - UI events drained by the host
//!
//! # Architecture
//!
//! `podcast-playback` does not decode audio. The media element is reached
//! through the [`AudioEngine`] trait and the now-playing surface through
//! [`MediaSessionBridge`], so the controller runs unchanged in tests, on
//! native hosts and in the browser (`wasm` feature).
//!
//! Everything is single-threaded: the host calls controller operations and
//! feeds engine feedback back in as [`EngineEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use podcast_playback::{
//!     AudioEngine, AudioPlaybackController, EngineEvent, EngineEventKind, NoMediaSession,
//!     PlaybackSettings, Result, SourceToken,
//! };
//! use podcast_core::Track;
//! use podcast_storage::{MemoryBackend, PersistentProgressStore, HISTORY_STORAGE_KEY};
//! use std::rc::Rc;
//!
//! // Implement AudioEngine for your platform
//! #[derive(Default)]
//! struct SilentEngine {
//!     position: f64,
//! }
//!
//! impl AudioEngine for SilentEngine {
//!     fn load(&mut self, _token: SourceToken, _url: &str) {}
//!     fn unsubscribe(&mut self, _token: &SourceToken) {}
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, time: f64) { self.position = time; }
//!     fn current_time(&self) -> f64 { self.position }
//!     fn duration(&self) -> f64 { 300.0 }
//! }
//!
//! let store = Rc::new(PersistentProgressStore::open(MemoryBackend::new(), HISTORY_STORAGE_KEY));
//! let mut player = AudioPlaybackController::new(
//!     Box::new(SilentEngine::default()),
//!     store,
//!     Box::new(NoMediaSession),
//!     PlaybackSettings::default(),
//! );
//!
//! player.play_track(Track::new("ep-1", "Pilot", "Show", "", "https://cdn/ep1.mp3", 1));
//!
//! // The engine reports metadata for the source the controller subscribed to
//! let source = player.live_source().cloned().unwrap();
//! player.handle_engine_event(EngineEvent::new(
//!     source,
//!     EngineEventKind::MetadataLoaded { duration: 300.0 },
//! ));
//! player.seek_to(120.0);
//!
//! // Pausing saves the position
//! player.toggle_play_pause();
//! assert_eq!(player.history().get_progress(&"ep-1".into()).progress, 120.0);
//! ```

mod controller;
mod engine;
mod error;
mod events;
mod history;
mod media_session;
mod scrub;
mod subscription;
pub mod config;
pub mod types;
mod unload;

#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use config::{LoggingSettings, PlaybackSettings, PlayerSettings, StorageSettings};
pub use controller::AudioPlaybackController;
pub use engine::{AudioEngine, EngineEvent, EngineEventKind, EngineEventQueue};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use history::HistoryFacade;
pub use media_session::{MediaSessionBridge, NoMediaSession};
pub use scrub::Scrubber;
pub use subscription::{SourceSubscriptions, SourceToken};
pub use types::{PlaybackPhase, PlaybackSnapshot};
pub use unload::{UnloadHook, UnloadResponse};
