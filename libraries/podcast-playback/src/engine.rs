//! Audio engine seam
//!
//! The controller never decodes or buffers audio itself. It drives a single
//! playable media resource through [`AudioEngine`] (an `HTMLAudioElement` in
//! the browser build, a mock in tests) and learns about progress through
//! [`EngineEvent`]s the host feeds back in.

use crate::error::Result;
use crate::subscription::SourceToken;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Handle over one playable media resource
///
/// Times are seconds as `f64`, matching the media element clock. `duration`
/// is NaN until the source's metadata is known.
pub trait AudioEngine {
    /// Point the engine at `url`
    ///
    /// Every event produced for this source must carry `token`.
    fn load(&mut self, token: SourceToken, url: &str);

    /// Stop delivering events for `token`
    fn unsubscribe(&mut self, token: &SourceToken);

    /// Start or resume output
    ///
    /// Browsers may refuse (autoplay policy); refusals that are only known
    /// later arrive as [`EngineEventKind::Error`].
    fn play(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self);

    /// Jump to `time` seconds
    fn seek(&mut self, time: f64);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Length of the loaded source in seconds, NaN when unknown
    fn duration(&self) -> f64;
}

/// What happened inside the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEventKind {
    /// Source metadata is available
    MetadataLoaded {
        /// Length in seconds (may be NaN or infinite for live streams)
        duration: f64,
    },

    /// Playback position advanced
    TimeUpdate {
        /// Position in seconds
        current_time: f64,
    },

    /// Playback reached the end of the source
    Ended,

    /// The engine failed asynchronously (rejected play, media error)
    Error {
        /// Human-readable cause
        message: String,
    },
}

/// DOM exception name of a `play()` request cut short by `pause()` or `load()`
const PLAY_INTERRUPTED: &str = "AbortError";

impl EngineEventKind {
    /// Event for a rejected `play()` request
    ///
    /// Returns `None` for an interruption, which is part of normal
    /// play/pause toggling rather than a failure.
    pub fn play_rejected(error_name: Option<&str>, detail: &str) -> Option<Self> {
        if error_name == Some(PLAY_INTERRUPTED) {
            return None;
        }
        Some(Self::Error {
            message: format!("playback rejected: {detail}"),
        })
    }
}

/// An engine event tagged with the source it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    /// Load that produced the event
    pub source: SourceToken,

    /// Event payload
    pub kind: EngineEventKind,
}

impl EngineEvent {
    /// Tag `kind` with `source`
    pub fn new(source: SourceToken, kind: EngineEventKind) -> Self {
        Self { source, kind }
    }
}

type Waker = Rc<dyn Fn(&EngineEventQueue)>;

#[derive(Default)]
struct QueueInner {
    events: RefCell<VecDeque<EngineEvent>>,
    waker: RefCell<Option<Waker>>,
}

/// FIFO of engine events shared between an engine and its host
///
/// Engine callbacks push; the host drains into the controller whenever it is
/// not already borrowed. An optional waker runs after every push.
#[derive(Clone, Default)]
pub struct EngineEventQueue {
    inner: Rc<QueueInner>,
}

impl EngineEventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and run the waker
    pub fn push(&self, event: EngineEvent) {
        self.inner.events.borrow_mut().push_back(event);

        let waker = self.inner.waker.borrow().clone();
        if let Some(waker) = waker {
            waker(self);
        }
    }

    /// Take the oldest event
    pub fn pop(&self) -> Option<EngineEvent> {
        self.inner.events.borrow_mut().pop_front()
    }

    /// Take every queued event in arrival order
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.inner.events.borrow_mut().drain(..).collect()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.inner.events.borrow().len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.inner.events.borrow().is_empty()
    }

    /// Run `waker` after every push
    ///
    /// The waker receives the queue rather than capturing it, so no
    /// reference cycle is formed.
    pub fn set_waker(&self, waker: impl Fn(&EngineEventQueue) + 'static) {
        *self.inner.waker.borrow_mut() = Some(Rc::new(waker));
    }

    /// Remove the waker
    pub fn clear_waker(&self) {
        self.inner.waker.borrow_mut().take();
    }
}

impl fmt::Debug for EngineEventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEventQueue")
            .field("len", &self.len())
            .field("has_waker", &self.inner.waker.borrow().is_some())
            .finish()
    }
}
