//! Seek-bar scrubbing
//!
//! While the user drags the seek slider the displayed time follows the
//! slider, and the controller is only sought once on release.

use crate::controller::AudioPlaybackController;

/// Local state of a seek slider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scrubber {
    seeking: bool,
    value: f64,
}

impl Scrubber {
    /// Create an idle scrubber
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down on the slider at `value` seconds
    pub fn begin(&mut self, value: f64) {
        self.seeking = true;
        self.value = value;
    }

    /// Slider moved to `value` seconds
    ///
    /// Moves that arrive without a `begin` (keyboard input) start a scrub.
    pub fn update(&mut self, value: f64) {
        self.seeking = true;
        self.value = value;
    }

    /// Pointer released: seek the controller to the slider value
    ///
    /// Returns the value handed to the controller, `None` if no scrub was in
    /// progress. The controller still ignores out-of-range values.
    pub fn commit(&mut self, controller: &mut AudioPlaybackController) -> Option<f64> {
        if !self.seeking {
            return None;
        }
        self.seeking = false;
        controller.seek_to(self.value);
        Some(self.value)
    }

    /// Abandon the scrub without seeking
    pub fn cancel(&mut self) {
        self.seeking = false;
    }

    /// Whether a scrub is in progress
    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    /// Time to display: the slider while scrubbing, otherwise `current_time`
    pub fn display_time(&self, current_time: f64) -> f64 {
        if self.seeking {
            self.value
        } else {
            current_time
        }
    }
}
