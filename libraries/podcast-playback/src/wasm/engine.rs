//! `HTMLAudioElement` engine

use crate::engine::{AudioEngine, EngineEvent, EngineEventKind, EngineEventQueue};
use crate::error::{PlaybackError, Result};
use crate::subscription::SourceToken;
use js_sys::Reflect;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// DOM listeners registered for one source
struct SourceListeners {
    token: SourceToken,
    callbacks: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

/// Audio engine over a detached `<audio>` element
///
/// Each load registers fresh `loadedmetadata`, `timeupdate`, `ended` and
/// `error` listeners that push events tagged with the load's token into the
/// shared queue. Unsubscribing removes them.
pub struct WebAudioEngine {
    audio: HtmlAudioElement,
    queue: EngineEventQueue,
    listeners: Option<SourceListeners>,
}

impl WebAudioEngine {
    /// Create the element; events are delivered to `queue`
    pub fn new(queue: EngineEventQueue) -> Result<Self> {
        let audio = HtmlAudioElement::new().map_err(|e| PlaybackError::host(format!("{e:?}")))?;
        audio.set_preload("metadata");

        Ok(Self {
            audio,
            queue,
            listeners: None,
        })
    }

    /// The bound media element
    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }

    fn listen(&mut self, token: SourceToken) {
        let mut callbacks: Vec<(&'static str, Closure<dyn FnMut()>)> = Vec::with_capacity(4);

        let audio = self.audio.clone();
        let queue = self.queue.clone();
        let source = token.clone();
        callbacks.push((
            "loadedmetadata",
            Closure::wrap(Box::new(move || {
                queue.push(EngineEvent::new(
                    source.clone(),
                    EngineEventKind::MetadataLoaded {
                        duration: audio.duration(),
                    },
                ));
            }) as Box<dyn FnMut()>),
        ));

        let audio = self.audio.clone();
        let queue = self.queue.clone();
        let source = token.clone();
        callbacks.push((
            "timeupdate",
            Closure::wrap(Box::new(move || {
                queue.push(EngineEvent::new(
                    source.clone(),
                    EngineEventKind::TimeUpdate {
                        current_time: audio.current_time(),
                    },
                ));
            }) as Box<dyn FnMut()>),
        ));

        let queue = self.queue.clone();
        let source = token.clone();
        callbacks.push((
            "ended",
            Closure::wrap(Box::new(move || {
                queue.push(EngineEvent::new(source.clone(), EngineEventKind::Ended));
            }) as Box<dyn FnMut()>),
        ));

        let audio = self.audio.clone();
        let queue = self.queue.clone();
        let source = token.clone();
        callbacks.push((
            "error",
            Closure::wrap(Box::new(move || {
                let message = audio.error().map_or_else(
                    || "media error".to_string(),
                    |e| format!("media error {}: {}", e.code(), e.message()),
                );
                queue.push(EngineEvent::new(
                    source.clone(),
                    EngineEventKind::Error { message },
                ));
            }) as Box<dyn FnMut()>),
        ));

        for (name, callback) in &callbacks {
            if let Err(e) = self
                .audio
                .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
            {
                tracing::warn!(listener = %name, error = ?e, "Failed to register media listener");
            }
        }

        self.listeners = Some(SourceListeners { token, callbacks });
    }

    fn unlisten(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            for (name, callback) in &listeners.callbacks {
                let _ = self
                    .audio
                    .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
            }
        }
    }
}

impl AudioEngine for WebAudioEngine {
    fn load(&mut self, token: SourceToken, url: &str) {
        self.unlisten();
        self.listen(token);
        self.audio.set_src(url);
        self.audio.load();
    }

    fn unsubscribe(&mut self, token: &SourceToken) {
        if self.listeners.as_ref().is_some_and(|l| &l.token == token) {
            self.unlisten();
        }
    }

    fn play(&mut self) -> Result<()> {
        let promise = self
            .audio
            .play()
            .map_err(|e| PlaybackError::engine(format!("{e:?}")))?;

        // Autoplay policy rejections settle later; report them as engine events
        let Some(token) = self.listeners.as_ref().map(|l| l.token.clone()) else {
            return Ok(());
        };
        let queue = self.queue.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let name = Reflect::get(&e, &JsValue::from_str("name"))
                    .ok()
                    .and_then(|n| n.as_string());
                match EngineEventKind::play_rejected(name.as_deref(), &format!("{e:?}")) {
                    Some(kind) => {
                        web_sys::console::warn_2(&JsValue::from_str("Playback failed:"), &e);
                        queue.push(EngineEvent::new(token, kind));
                    }
                    None => tracing::debug!(source = %token, "play() interrupted by pause or load"),
                }
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.audio.pause() {
            tracing::warn!(error = ?e, "Media element refused to pause");
        }
    }

    fn seek(&mut self, time: f64) {
        self.audio.set_current_time(time);
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }
}

impl Drop for WebAudioEngine {
    fn drop(&mut self) {
        self.unlisten();
        let _ = self.audio.pause();
    }
}
