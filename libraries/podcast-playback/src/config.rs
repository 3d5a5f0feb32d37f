/// Player settings
use crate::error::{PlaybackError, Result};
use podcast_storage::HISTORY_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use {
    podcast_storage::{FileBackend, PersistentProgressStore, ProgressStore},
    std::rc::Rc,
};

/// Settings file read when present
pub const DEFAULT_CONFIG_FILE: &str = "podcast-player.toml";

/// Environment variable overriding the settings file path
pub const CONFIG_PATH_ENV: &str = "PODCAST_PLAYER_CONFIG";

/// Prefix of environment overrides (`PODCAST_PLAYBACK__CONFIRM_ON_UNLOAD=false`)
pub const ENV_PREFIX: &str = "PODCAST";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Key the progress mapping is stored under
    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// Directory of the file backend on native hosts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Minimum position change between `PositionUpdate` events (0 = every tick)
    #[serde(default)]
    pub position_update_interval_secs: f64,

    /// Ask before leaving the page while an episode is playing
    #[serde(default = "default_confirm_on_unload")]
    pub confirm_on_unload: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl PlayerSettings {
    /// Load settings from file and environment
    ///
    /// Reads `PODCAST_PLAYER_CONFIG` or `podcast-player.toml` when present,
    /// then applies `PODCAST_*` environment overrides.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path)
    }

    /// Load settings from `path` (skipped if missing) and environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        // Override with environment variables (prefixed with PODCAST_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlaybackError::config(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| PlaybackError::config(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Open the file-backed progress store under `storage.data_dir`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_progress_store(&self) -> Rc<dyn ProgressStore> {
        Rc::new(PersistentProgressStore::open(
            FileBackend::new(&self.storage.data_dir),
            self.storage.history_key.clone(),
        ))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.history_key.trim().is_empty() {
            return Err(PlaybackError::config("storage.history_key must not be empty"));
        }

        let interval = self.playback.position_update_interval_secs;
        if !interval.is_finite() || interval < 0.0 {
            return Err(PlaybackError::config(format!(
                "playback.position_update_interval_secs must be a non-negative number, got {}",
                interval
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(PlaybackError::config("logging.filter must not be empty"));
        }

        Ok(())
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            history_key: default_history_key(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            position_update_interval_secs: 0.0,
            confirm_on_unload: default_confirm_on_unload(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default values
fn default_history_key() -> String {
    HISTORY_STORAGE_KEY.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_confirm_on_unload() -> bool {
    true
}

fn default_log_filter() -> String {
    "podcast_playback=info,podcast_storage=info".to_string()
}
