//! `navigator.mediaSession` bridge

use crate::media_session::MediaSessionBridge;
use js_sys::Reflect;
use wasm_bindgen::JsValue;

/// Clears the browser's now-playing metadata
///
/// `navigator.mediaSession` is looked up reflectively on every call; browsers
/// without it are silently skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserMediaSession;

impl BrowserMediaSession {
    /// Create the bridge
    pub fn new() -> Self {
        Self
    }

    fn session() -> Option<JsValue> {
        let navigator = web_sys::window()?.navigator();
        let session = Reflect::get(&navigator, &JsValue::from_str("mediaSession")).ok()?;
        if session.is_undefined() || session.is_null() {
            None
        } else {
            Some(session)
        }
    }
}

impl MediaSessionBridge for BrowserMediaSession {
    fn clear_media_session(&mut self) {
        let Some(session) = Self::session() else {
            tracing::trace!("Media session unavailable");
            return;
        };

        let cleared = Reflect::set(&session, &JsValue::from_str("metadata"), &JsValue::NULL)
            .and_then(|_| {
                Reflect::set(
                    &session,
                    &JsValue::from_str("playbackState"),
                    &JsValue::from_str("none"),
                )
            });
        if let Err(e) = cleared {
            tracing::debug!(error = ?e, "Failed to clear media session");
        }
    }
}
