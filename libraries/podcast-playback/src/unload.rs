//! Unload protection
//!
//! A page that is about to close gets one last chance to persist the
//! position of a playing episode and to ask the user to confirm leaving.

use crate::error::Result;

/// What the host should do with an imminent page unload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadResponse {
    /// Ask the user to confirm leaving the page
    ConfirmLeave,

    /// Let the page go
    Proceed,
}

/// Subscription to the host's termination and visibility signals
///
/// Installed on the controller once; the controller detaches it when it is
/// disposed.
pub trait UnloadHook {
    /// Start listening
    fn attach(&mut self) -> Result<()>;

    /// Stop listening; detaching twice is harmless
    fn detach(&mut self);
}
