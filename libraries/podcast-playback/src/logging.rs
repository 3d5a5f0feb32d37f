//! Log subscriber setup for native hosts
//!
//! Browser builds log through `tracing` as well, but leave subscriber
//! installation to the page and mirror user-relevant warnings to the
//! console themselves.

use crate::config::LoggingSettings;
use crate::error::{PlaybackError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatted subscriber filtered by `RUST_LOG` or the settings
///
/// Fails if a global subscriber is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|e| PlaybackError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| PlaybackError::Logging(e.to_string()))
}
