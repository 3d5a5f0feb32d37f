//! Now-playing surface integration

/// Best-effort sink for the OS/browser "now playing" surface
///
/// Implementations must never fail or panic when the surface is missing.
pub trait MediaSessionBridge {
    /// Remove any now-playing metadata and mark the session idle
    fn clear_media_session(&mut self);
}

/// For hosts without a now-playing surface
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMediaSession;

impl MediaSessionBridge for NoMediaSession {
    fn clear_media_session(&mut self) {}
}
