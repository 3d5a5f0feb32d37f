//! Shared test helpers for playback integration tests
//!
//! The mock engine and the journaling storage backend write into one
//! operation log, so tests can assert the relative order of engine commands
//! and progress writes.

#![allow(dead_code)]

use podcast_core::{EpisodeId, ProgressRecord, Track};
use podcast_playback::{
    AudioEngine, AudioPlaybackController, EngineEvent, EngineEventKind, MediaSessionBridge,
    PlaybackError, PlaybackSettings, PlayerEvent, Result, SourceToken, UnloadHook,
};
use podcast_storage::{
    KeyValueBackend, ManualClock, MemoryBackend, PersistentProgressStore, ProgressStore,
    StorageError, HISTORY_STORAGE_KEY,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

// ===== Operation Log =====

/// Something the controller did to a collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Load { episode: String, url: String },
    Unsubscribe { episode: String },
    Play,
    Pause,
    Seek(f64),
    Persist,
}

pub type OpLog = Rc<RefCell<Vec<Op>>>;

// ===== Mock Engine =====

/// Observable state of the mock media element
#[derive(Debug)]
pub struct EngineState {
    pub token: Option<SourceToken>,
    pub url: Option<String>,
    pub position: f64,
    pub duration: f64,
    pub playing: bool,
    pub fail_play: bool,
    pub unsubscribed: Vec<SourceToken>,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            token: None,
            url: None,
            position: 0.0,
            duration: f64::NAN,
            playing: false,
            fail_play: false,
            unsubscribed: Vec::new(),
        }
    }
}

/// Engine that behaves like a media element driven by the test
pub struct MockEngine {
    state: Rc<RefCell<EngineState>>,
    log: OpLog,
}

impl AudioEngine for MockEngine {
    fn load(&mut self, token: SourceToken, url: &str) {
        self.log.borrow_mut().push(Op::Load {
            episode: token.episode_id.to_string(),
            url: url.to_string(),
        });
        let mut state = self.state.borrow_mut();
        state.token = Some(token);
        state.url = Some(url.to_string());
        state.position = 0.0;
        state.duration = f64::NAN;
    }

    fn unsubscribe(&mut self, token: &SourceToken) {
        self.log.borrow_mut().push(Op::Unsubscribe {
            episode: token.episode_id.to_string(),
        });
        self.state.borrow_mut().unsubscribed.push(token.clone());
    }

    fn play(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Op::Play);
        let mut state = self.state.borrow_mut();
        if state.fail_play {
            return Err(PlaybackError::engine("NotAllowedError: play() requires a user gesture"));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.borrow_mut().push(Op::Pause);
        self.state.borrow_mut().playing = false;
    }

    fn seek(&mut self, time: f64) {
        self.log.borrow_mut().push(Op::Seek(time));
        self.state.borrow_mut().position = time;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().position
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }
}

// ===== Journaling Backend =====

/// In-memory backend that logs writes and can be made to fail
pub struct JournalingBackend {
    inner: MemoryBackend,
    log: OpLog,
    pub fail_writes: Cell<bool>,
}

impl KeyValueBackend for JournalingBackend {
    fn get(&self, key: &str) -> podcast_storage::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> podcast_storage::Result<()> {
        if self.fail_writes.get() {
            return Err(StorageError::backend("QuotaExceededError"));
        }
        self.log.borrow_mut().push(Op::Persist);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> podcast_storage::Result<()> {
        self.inner.remove(key)
    }
}

// ===== Media Session / Unload Hook =====

/// Counts now-playing clears
pub struct RecordingMediaSession {
    pub clears: Rc<Cell<usize>>,
}

impl MediaSessionBridge for RecordingMediaSession {
    fn clear_media_session(&mut self) {
        self.clears.set(self.clears.get() + 1);
    }
}

/// Attach/detach counters of a mock unload hook
#[derive(Debug, Default)]
pub struct HookState {
    pub attached: Cell<u32>,
    pub detached: Cell<u32>,
}

pub struct MockUnloadHook {
    pub state: Rc<HookState>,
    pub fail_attach: bool,
}

impl UnloadHook for MockUnloadHook {
    fn attach(&mut self) -> Result<()> {
        if self.fail_attach {
            return Err(PlaybackError::host("no global window"));
        }
        self.state.attached.set(self.state.attached.get() + 1);
        Ok(())
    }

    fn detach(&mut self) {
        self.state.detached.set(self.state.detached.get() + 1);
    }
}

// ===== Harness =====

/// A controller wired to mocks, plus handles on every mock
pub struct Harness {
    pub controller: AudioPlaybackController,
    pub engine: Rc<RefCell<EngineState>>,
    pub store: Rc<PersistentProgressStore<JournalingBackend>>,
    pub clock: Rc<ManualClock>,
    pub log: OpLog,
    pub media_clears: Rc<Cell<usize>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(PlaybackSettings::default())
    }

    pub fn with_settings(settings: PlaybackSettings) -> Self {
        Self::with_history(settings, BTreeMap::new())
    }

    /// Start with `records` already persisted
    pub fn with_history(
        settings: PlaybackSettings,
        records: BTreeMap<EpisodeId, ProgressRecord>,
    ) -> Self {
        let log: OpLog = Rc::new(RefCell::new(Vec::new()));
        let inner = MemoryBackend::new();
        if !records.is_empty() {
            let payload = serde_json::to_string(&records).unwrap();
            inner.set(HISTORY_STORAGE_KEY, &payload).unwrap();
        }

        let clock = Rc::new(ManualClock::new(1_700_000_000_000));
        let store = Rc::new(PersistentProgressStore::open_with_clock(
            JournalingBackend {
                inner,
                log: Rc::clone(&log),
                fail_writes: Cell::new(false),
            },
            HISTORY_STORAGE_KEY,
            clock.clone(),
        ));

        let engine_state = Rc::new(RefCell::new(EngineState::default()));
        let media_clears = Rc::new(Cell::new(0));

        let controller = AudioPlaybackController::new(
            Box::new(MockEngine {
                state: Rc::clone(&engine_state),
                log: Rc::clone(&log),
            }),
            store.clone(),
            Box::new(RecordingMediaSession {
                clears: Rc::clone(&media_clears),
            }),
            settings,
        );

        Self {
            controller,
            engine: engine_state,
            store,
            clock,
            log,
            media_clears,
        }
    }

    /// Token of the source the engine currently has loaded
    pub fn token(&self) -> SourceToken {
        self.engine
            .borrow()
            .token
            .clone()
            .expect("engine has no source loaded")
    }

    /// Engine reports metadata for the loaded source
    pub fn metadata(&mut self, duration: f64) {
        self.engine.borrow_mut().duration = duration;
        let token = self.token();
        self.controller.handle_engine_event(EngineEvent::new(
            token,
            EngineEventKind::MetadataLoaded { duration },
        ));
    }

    /// Engine plays forward to `time`
    pub fn advance_to(&mut self, time: f64) {
        self.engine.borrow_mut().position = time;
        let token = self.token();
        self.controller.handle_engine_event(EngineEvent::new(
            token,
            EngineEventKind::TimeUpdate { current_time: time },
        ));
    }

    /// Engine reaches the end of the source
    pub fn end(&mut self) {
        let duration = self.engine.borrow().duration;
        self.engine.borrow_mut().position = duration;
        let token = self.token();
        self.controller
            .handle_engine_event(EngineEvent::new(token, EngineEventKind::Ended));
    }

    /// Load `id` and make its metadata known
    pub fn start(&mut self, id: &str, duration: f64) {
        self.controller.play_track(track(id));
        self.metadata(duration);
    }

    pub fn record(&self, id: &str) -> ProgressRecord {
        self.store.get_progress(&EpisodeId::new(id))
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn ops(&self) -> Vec<Op> {
        self.log.borrow().clone()
    }

    pub fn events(&mut self) -> Vec<PlayerEvent> {
        self.controller.drain_events()
    }
}

pub fn track(id: &str) -> Track {
    Track::new(
        id,
        format!("Episode {}", id),
        "Test Show",
        "https://cdn.example.com/show.jpg",
        format!("https://cdn.example.com/{}.mp3", id),
        1,
    )
}

pub fn record(progress: f64, finished: bool, timestamp: i64) -> ProgressRecord {
    ProgressRecord {
        progress,
        finished,
        timestamp,
    }
}
