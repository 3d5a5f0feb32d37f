//! `beforeunload` / `visibilitychange` hook

use crate::controller::AudioPlaybackController;
use crate::error::{PlaybackError, Result};
use crate::unload::{UnloadHook, UnloadResponse};
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{BeforeUnloadEvent, Document, Window};

/// Saves progress when the page is hidden or closed
///
/// Holds the controller weakly so the controller can own the hook.
pub struct BrowserUnloadHook {
    controller: Weak<RefCell<AudioPlaybackController>>,
    before_unload: Option<Closure<dyn FnMut(BeforeUnloadEvent)>>,
    visibility_change: Option<Closure<dyn FnMut()>>,
}

impl BrowserUnloadHook {
    /// Create a detached hook for `controller`
    pub fn new(controller: Weak<RefCell<AudioPlaybackController>>) -> Self {
        Self {
            controller,
            before_unload: None,
            visibility_change: None,
        }
    }

    fn window() -> Result<Window> {
        web_sys::window().ok_or_else(|| PlaybackError::host("no global window"))
    }

    fn document() -> Result<Document> {
        Self::window()?
            .document()
            .ok_or_else(|| PlaybackError::host("window has no document"))
    }
}

impl UnloadHook for BrowserUnloadHook {
    fn attach(&mut self) -> Result<()> {
        self.detach();

        let controller = self.controller.clone();
        let before_unload = Closure::wrap(Box::new(move |event: BeforeUnloadEvent| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            let Ok(mut controller) = controller.try_borrow_mut() else {
                return;
            };
            if controller.handle_before_unload() == UnloadResponse::ConfirmLeave {
                event.prevent_default();
                event.set_return_value("");
            }
        }) as Box<dyn FnMut(BeforeUnloadEvent)>);

        let controller = self.controller.clone();
        let visibility_change = Closure::wrap(Box::new(move || {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .is_some_and(|d| d.hidden());
            if !hidden {
                return;
            }
            if let Some(controller) = controller.upgrade() {
                if let Ok(mut controller) = controller.try_borrow_mut() {
                    controller.handle_visibility_hidden();
                }
            }
        }) as Box<dyn FnMut()>);

        Self::window()?
            .add_event_listener_with_callback(
                "beforeunload",
                before_unload.as_ref().unchecked_ref(),
            )
            .map_err(|e| PlaybackError::host(format!("beforeunload listener: {e:?}")))?;
        self.before_unload = Some(before_unload);

        Self::document()?
            .add_event_listener_with_callback(
                "visibilitychange",
                visibility_change.as_ref().unchecked_ref(),
            )
            .map_err(|e| PlaybackError::host(format!("visibilitychange listener: {e:?}")))?;
        self.visibility_change = Some(visibility_change);

        Ok(())
    }

    fn detach(&mut self) {
        if let Some(callback) = self.before_unload.take() {
            if let Ok(window) = Self::window() {
                let _ = window.remove_event_listener_with_callback(
                    "beforeunload",
                    callback.as_ref().unchecked_ref(),
                );
            }
        }
        if let Some(callback) = self.visibility_change.take() {
            if let Ok(document) = Self::document() {
                let _ = document.remove_event_listener_with_callback(
                    "visibilitychange",
                    callback.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

impl Drop for BrowserUnloadHook {
    fn drop(&mut self) {
        self.detach();
    }
}
