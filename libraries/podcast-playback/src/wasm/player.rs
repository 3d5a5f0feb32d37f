//! WASM-compatible audio player facade

use super::{BrowserMediaSession, BrowserUnloadHook, WebAudioEngine};
use crate::{
    AudioPlaybackController, EngineEventQueue, PlaybackError, PlayerEvent, PlayerSettings,
};
use js_sys::Function;
use podcast_core::{format_clock, EpisodeId, Track};
use podcast_storage::{
    LocalStorageBackend, MemoryBackend, PersistentProgressStore, ProgressStore,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

type EventCallback = Rc<RefCell<Option<Function>>>;

/// The global podcast player, exported to JavaScript
///
/// Methods take `&self` so an `onEvent` callback may call back into the
/// player.
#[wasm_bindgen]
pub struct WasmAudioPlayer {
    controller: Rc<RefCell<AudioPlaybackController>>,
    queue: EngineEventQueue,
    audio: HtmlAudioElement,
    on_event: EventCallback,
}

#[wasm_bindgen]
impl WasmAudioPlayer {
    /// Create a player, optionally with a settings object
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<WasmAudioPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let settings: PlayerSettings = if settings.is_undefined() || settings.is_null() {
            PlayerSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings)
                .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?
        };
        settings.validate().map_err(to_js)?;

        let store = open_store(&settings.storage.history_key);
        let queue = EngineEventQueue::new();
        let engine = WebAudioEngine::new(queue.clone()).map_err(to_js)?;
        let audio = engine.element().clone();

        let controller = Rc::new(RefCell::new(AudioPlaybackController::new(
            Box::new(engine),
            store,
            Box::new(BrowserMediaSession::new()),
            settings.playback,
        )));
        controller
            .borrow_mut()
            .install_unload_hook(Box::new(BrowserUnloadHook::new(Rc::downgrade(&controller))))
            .map_err(to_js)?;

        let on_event: EventCallback = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&controller);
        let callback = Rc::clone(&on_event);
        queue.set_waker(move |queue| {
            if let Some(controller) = weak.upgrade() {
                if let Ok(mut inner) = controller.try_borrow_mut() {
                    inner.pump(queue);
                }
                dispatch(&controller, &callback);
            }
        });

        Ok(Self {
            controller,
            queue,
            audio,
            on_event,
        })
    }

    // ===== Playback Control =====

    /// Play an episode (`{ id, title, showTitle, showImage, file, episodeNumber }`)
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(&self, track: JsValue) -> Result<(), JsValue> {
        let track: Track = serde_wasm_bindgen::from_value(track)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse track: {}", e)))?;
        track.validate().map_err(|e| to_js(PlaybackError::from(e)))?;

        self.with_controller(|c| c.play_track(track));
        Ok(())
    }

    /// Pause or resume
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) {
        self.with_controller(AudioPlaybackController::toggle_play_pause);
    }

    /// Seek to position in seconds
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&self, time: f64) {
        self.with_controller(|c| c.seek_to(time));
    }

    /// Save the current position now
    #[wasm_bindgen(js_name = saveCurrentProgress)]
    pub fn save_current_progress(&self) {
        self.with_controller(AudioPlaybackController::save_current_progress);
    }

    // ===== State Queries =====

    /// Current episode, or `null`
    #[wasm_bindgen(js_name = getCurrentTrack)]
    pub fn get_current_track(&self) -> JsValue {
        let controller = self.controller.borrow();
        controller
            .current_track()
            .and_then(|t| serde_wasm_bindgen::to_value(t).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// Playback intent
    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.controller.borrow().is_playing()
    }

    /// Position in seconds
    #[wasm_bindgen(js_name = getCurrentTime)]
    pub fn get_current_time(&self) -> f64 {
        self.controller.borrow().current_time()
    }

    /// Duration in seconds, 0 while unknown
    #[wasm_bindgen(js_name = getDuration)]
    pub fn get_duration(&self) -> f64 {
        self.controller.borrow().duration()
    }

    /// Phase name ("idle" | "loading" | "playing" | "paused" | "ended")
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.controller.borrow().phase().as_str().to_string()
    }

    /// Whole observable state as one object
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.controller.borrow().snapshot()).unwrap_or(JsValue::NULL)
    }

    /// The bound `<audio>` element
    #[wasm_bindgen(getter, js_name = audioElement)]
    pub fn audio_element(&self) -> HtmlAudioElement {
        self.audio.clone()
    }

    // ===== Listening History =====

    /// Stored progress of an episode (`{ progress, finished, timestamp }`)
    #[wasm_bindgen(js_name = getProgress)]
    pub fn get_progress(&self, episode_id: &str) -> JsValue {
        let record = self
            .controller
            .borrow()
            .history()
            .get_progress(&EpisodeId::new(episode_id));
        serde_wasm_bindgen::to_value(&record).unwrap_or(JsValue::NULL)
    }

    /// Forget all listening progress
    #[wasm_bindgen(js_name = resetHistory)]
    pub fn reset_history(&self) {
        self.controller.borrow().history().reset_history();
    }

    /// Most recently listened episodes (`[[id, record], ...]`)
    #[wasm_bindgen(js_name = getRecentlyPlayed)]
    pub fn get_recently_played(&self, limit: usize) -> JsValue {
        let recent = self.controller.borrow().history().recently_played(limit);
        serde_wasm_bindgen::to_value(&recent).unwrap_or(JsValue::NULL)
    }

    /// Format seconds as `MM:SS`
    #[wasm_bindgen(js_name = formatTime)]
    pub fn format_time(seconds: f64) -> String {
        format_clock(seconds)
    }

    // ===== Event Listeners =====

    /// Register the player event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.on_event.borrow_mut() = Some(callback);
    }

    /// Save progress and release the element listeners
    pub fn dispose(&self) {
        self.queue.clear_waker();
        self.with_controller(AudioPlaybackController::dispose);
    }

    // ===== Internal =====

    fn with_controller(&self, f: impl FnOnce(&mut AudioPlaybackController)) {
        {
            let mut controller = self.controller.borrow_mut();
            controller.pump(&self.queue);
            f(&mut controller);
            controller.pump(&self.queue);
        }
        dispatch(&self.controller, &self.on_event);
    }
}

/// Hand drained controller events to the JavaScript callback
fn dispatch(controller: &Rc<RefCell<AudioPlaybackController>>, on_event: &EventCallback) {
    let events: Vec<PlayerEvent> = match controller.try_borrow_mut() {
        Ok(mut controller) => controller.drain_events(),
        Err(_) => return,
    };
    if events.is_empty() {
        return;
    }

    let Some(callback) = on_event.borrow().clone() else {
        return;
    };
    for event in events {
        match serde_wasm_bindgen::to_value(&event) {
            Ok(value) => {
                callback.call1(&JsValue::NULL, &value).ok();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize player event"),
        }
    }
}

fn open_store(key: &str) -> Rc<dyn ProgressStore> {
    match LocalStorageBackend::new() {
        Ok(backend) => Rc::new(PersistentProgressStore::open(backend, key)),
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "Listening history will not persist: {}",
                e
            )));
            tracing::warn!(error = %e, "localStorage unavailable, keeping history in memory");
            Rc::new(PersistentProgressStore::open(MemoryBackend::new(), key))
        }
    }
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
