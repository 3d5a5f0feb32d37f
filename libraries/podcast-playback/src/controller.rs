//! Audio playback controller - core orchestration
//!
//! Owns the single active track and keeps three things consistent: the play
//! intent the UI shows, the media engine, and the durable listening progress
//! of each episode.
//!
//! Progress is flushed to the store when the user pauses, before switching
//! to another episode, when the page is hidden or unloads, and on teardown.
//! When a new source's metadata arrives the stored position is read and the
//! engine jumps there.

use crate::{
    config::PlaybackSettings,
    engine::{AudioEngine, EngineEvent, EngineEventKind, EngineEventQueue},
    error::Result,
    events::PlayerEvent,
    history::HistoryFacade,
    media_session::MediaSessionBridge,
    subscription::{SourceSubscriptions, SourceToken},
    types::{PlaybackPhase, PlaybackSnapshot},
    unload::{UnloadHook, UnloadResponse},
};
use podcast_core::Track;
use podcast_storage::ProgressStore;
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

/// Playback state machine for one audio engine
///
/// Phases: `Idle → Loading → Playing ⇄ Paused → Ended`. Public operations
/// never fail; engine problems are logged and reported as
/// [`PlayerEvent::Error`].
pub struct AudioPlaybackController {
    engine: Box<dyn AudioEngine>,
    history: HistoryFacade,
    media_session: Box<dyn MediaSessionBridge>,
    unload_hook: Option<Box<dyn UnloadHook>>,
    subscriptions: SourceSubscriptions,
    settings: PlaybackSettings,

    current_track: Option<Track>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    phase: PlaybackPhase,

    /// Position carried by the last `PositionUpdate`
    last_reported_time: Option<f64>,

    pending_events: Vec<PlayerEvent>,
    disposed: bool,
}

impl AudioPlaybackController {
    /// Create an idle controller
    pub fn new(
        engine: Box<dyn AudioEngine>,
        store: Rc<dyn ProgressStore>,
        media_session: Box<dyn MediaSessionBridge>,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            engine,
            history: HistoryFacade::new(store),
            media_session,
            unload_hook: None,
            subscriptions: SourceSubscriptions::new(),
            settings,
            current_track: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            phase: PlaybackPhase::Idle,
            last_reported_time: None,
            pending_events: Vec::new(),
            disposed: false,
        }
    }

    /// Attach `hook` and keep it until disposal
    ///
    /// A previously installed hook is detached first.
    pub fn install_unload_hook(&mut self, mut hook: Box<dyn UnloadHook>) -> Result<()> {
        if let Some(mut old) = self.unload_hook.take() {
            old.detach();
        }
        hook.attach()?;
        self.unload_hook = Some(hook);
        Ok(())
    }

    // ===== Playback Control =====

    /// Play `track`, loading it first if it is not the current episode
    ///
    /// The position of the outgoing episode is saved before the engine is
    /// pointed at the new source.
    pub fn play_track(&mut self, track: Track) {
        if self.disposed {
            warn!(episode = %track.id, "play_track on a disposed controller");
            return;
        }

        let before = self.observable_state();
        self.save_current_progress();

        let switching = self
            .current_track
            .as_ref()
            .map_or(true, |current| !current.is_same_episode(&track));

        if switching {
            self.load_source(track);
        }

        let start = switching || !self.is_playing;
        self.is_playing = true;
        if start {
            self.start_engine();
        }

        self.settle_phase(before);
    }

    /// Pause a playing episode or resume a paused one
    ///
    /// Does nothing while no track is loaded.
    pub fn toggle_play_pause(&mut self) {
        if self.disposed || self.current_track.is_none() {
            debug!("Toggle ignored: no track loaded");
            return;
        }

        let before = self.observable_state();

        if self.is_playing {
            self.save_current_progress();
            self.media_session.clear_media_session();
            self.is_playing = false;
            self.engine.pause();
        } else {
            self.is_playing = true;
            self.start_engine();
        }

        self.settle_phase(before);
    }

    /// Jump to `time` seconds in the current episode
    ///
    /// Ignored unless a track is loaded, its duration is known and `time`
    /// lies within `[0, duration]`.
    pub fn seek_to(&mut self, time: f64) {
        if self.disposed || self.current_track.is_none() {
            debug!(time, "Seek ignored: no track loaded");
            return;
        }
        if self.duration <= 0.0 {
            debug!(time, "Seek ignored: duration unknown");
            return;
        }
        if !time.is_finite() || time < 0.0 || time > self.duration {
            debug!(time, duration = self.duration, "Seek ignored: out of range");
            return;
        }

        self.engine.seek(time);
        self.current_time = time;
        self.emit_position_update(true);
    }

    // ===== Engine Feedback =====

    /// Apply one engine event
    ///
    /// Events for anything but the live source are dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        if !self.subscriptions.accepts(&event.source) {
            trace!(source = %event.source, kind = ?event.kind, "Dropping stale engine event");
            return;
        }

        match event.kind {
            EngineEventKind::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            EngineEventKind::TimeUpdate { current_time } => self.on_time_update(current_time),
            EngineEventKind::Ended => self.on_ended(),
            EngineEventKind::Error { message } => self.report_engine_error(message),
        }
    }

    /// Apply every event queued in `queue`, in arrival order
    ///
    /// Returns how many events were taken from the queue.
    pub fn pump(&mut self, queue: &EngineEventQueue) -> usize {
        let mut handled = 0;
        while let Some(event) = queue.pop() {
            self.handle_engine_event(event);
            handled += 1;
        }
        handled
    }

    fn on_metadata_loaded(&mut self, duration: f64) {
        let before = self.observable_state();

        self.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };

        if let Some(id) = self.current_track.as_ref().map(|t| t.id.clone()) {
            let record = self.history.get_progress(&id);
            if record.has_progress() {
                let position = if self.duration > 0.0 {
                    record.progress.min(self.duration)
                } else {
                    record.progress
                };
                debug!(episode = %id, position, "Resuming from stored progress");
                self.engine.seek(position);
                self.current_time = position;
                self.pending_events.push(PlayerEvent::ResumedFromHistory {
                    episode_id: id,
                    position,
                });
            }
        }

        if self.phase == PlaybackPhase::Loading {
            self.phase = if self.is_playing {
                PlaybackPhase::Playing
            } else {
                PlaybackPhase::Paused
            };
        }

        self.emit_position_update(true);
        self.settle_phase(before);
    }

    fn on_time_update(&mut self, current_time: f64) {
        if !current_time.is_finite() {
            return;
        }
        self.current_time = current_time;
        self.emit_position_update(false);
    }

    fn on_ended(&mut self) {
        let before = self.observable_state();

        // The element's final duration wins over the metadata estimate
        let engine_duration = self.engine.duration();
        let duration = if engine_duration.is_finite() && engine_duration > 0.0 {
            engine_duration
        } else {
            self.duration
        };

        if let Some(id) = self.current_track.as_ref().map(|t| t.id.clone()) {
            if duration.is_finite() && duration > 0.0 {
                self.history.update_progress(&id, duration, duration);
                self.pending_events.push(PlayerEvent::ProgressSaved {
                    episode_id: id.clone(),
                    progress: duration,
                    finished: true,
                });
            }
            info!(episode = %id, "Episode finished");
            self.pending_events
                .push(PlayerEvent::TrackFinished { episode_id: id });
        }

        self.media_session.clear_media_session();
        self.is_playing = false;
        self.current_time = 0.0;
        self.phase = PlaybackPhase::Ended;
        self.emit_position_update(true);
        self.settle_phase(before);
    }

    fn report_engine_error(&mut self, message: String) {
        warn!(error = %message, "Audio engine error");
        self.pending_events.push(PlayerEvent::Error { message });
    }

    // ===== Persistence =====

    /// Write the engine's position for the current episode to the store
    ///
    /// Skipped while the engine does not know the source's duration.
    pub fn save_current_progress(&mut self) {
        let Some(track) = self.current_track.as_ref() else {
            return;
        };

        let duration = self.engine.duration();
        if !(duration.is_finite() && duration > 0.0) {
            trace!(episode = %track.id, "Skipping save: duration unknown");
            return;
        }

        let position = self.engine.current_time();
        self.history.update_progress(&track.id, position, duration);

        let record = self.history.get_progress(&track.id);
        self.pending_events.push(PlayerEvent::ProgressSaved {
            episode_id: track.id.clone(),
            progress: record.progress,
            finished: record.finished,
        });
    }

    /// The page is about to unload
    ///
    /// Saves a playing episode and asks for confirmation when configured.
    pub fn handle_before_unload(&mut self) -> UnloadResponse {
        if !self.is_playing {
            return UnloadResponse::Proceed;
        }

        self.save_current_progress();
        if self.settings.confirm_on_unload {
            UnloadResponse::ConfirmLeave
        } else {
            UnloadResponse::Proceed
        }
    }

    /// The page was hidden; save a playing episode
    pub fn handle_visibility_hidden(&mut self) {
        if self.is_playing {
            self.save_current_progress();
        }
    }

    /// Save progress and release the engine subscription and unload hook
    ///
    /// Later calls do nothing. Also run on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.save_current_progress();

        if let Some(token) = self.subscriptions.cancel() {
            self.engine.unsubscribe(&token);
        }
        if let Some(mut hook) = self.unload_hook.take() {
            hook.detach();
        }
        debug!("Playback controller disposed");
    }

    // ===== State Queries =====

    /// Loaded episode
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Playback intent
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Source length in seconds, 0 while unknown
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Lifecycle phase
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Whether `dispose` has run
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The live source subscription
    pub fn live_source(&self) -> Option<&SourceToken> {
        self.subscriptions.live()
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            phase: self.phase,
        }
    }

    /// Listening history the controller writes to
    pub fn history(&self) -> &HistoryFacade {
        &self.history
    }

    /// Playback settings in effect
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    // ===== Events =====

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Whether events are waiting to be drained
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn load_source(&mut self, track: Track) {
        let previous_id = self.current_track.as_ref().map(|t| t.id.clone());

        let (token, superseded) = self.subscriptions.subscribe(track.id.clone());
        if let Some(old) = superseded {
            self.engine.unsubscribe(&old);
        }

        info!(episode = %track.id, source = %token, "Loading episode");
        self.current_time = 0.0;
        self.duration = 0.0;
        self.last_reported_time = None;
        self.phase = PlaybackPhase::Loading;
        self.engine.load(token, &track.file);

        self.pending_events.push(PlayerEvent::TrackChanged {
            episode_id: track.id.clone(),
            previous_episode_id: previous_id,
        });
        self.current_track = Some(track);
    }

    fn start_engine(&mut self) {
        if let Err(e) = self.engine.play() {
            self.report_engine_error(e.to_string());
        }
    }

    fn observable_state(&self) -> (PlaybackPhase, bool) {
        (self.phase, self.is_playing)
    }

    /// Derive the phase from the play intent and emit `StateChanged` if
    /// anything observable moved since `before`
    fn settle_phase(&mut self, before: (PlaybackPhase, bool)) {
        self.phase = match self.phase {
            _ if self.current_track.is_none() => PlaybackPhase::Idle,
            PlaybackPhase::Loading => PlaybackPhase::Loading,
            _ if self.is_playing => PlaybackPhase::Playing,
            PlaybackPhase::Ended => PlaybackPhase::Ended,
            _ => PlaybackPhase::Paused,
        };

        if self.observable_state() != before {
            self.pending_events.push(PlayerEvent::StateChanged {
                phase: self.phase,
                is_playing: self.is_playing,
            });
        }
    }

    fn emit_position_update(&mut self, force: bool) {
        let interval = self.settings.position_update_interval_secs;
        let due = force
            || interval <= 0.0
            || self
                .last_reported_time
                .map_or(true, |last| (self.current_time - last).abs() >= interval);

        if due {
            self.last_reported_time = Some(self.current_time);
            self.pending_events.push(PlayerEvent::PositionUpdate {
                current_time: self.current_time,
                duration: self.duration,
            });
        }
    }
}

impl Drop for AudioPlaybackController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for AudioPlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlaybackController")
            .field("current_track", &self.current_track.as_ref().map(|t| &t.id))
            .field("is_playing", &self.is_playing)
            .field("current_time", &self.current_time)
            .field("duration", &self.duration)
            .field("phase", &self.phase)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
