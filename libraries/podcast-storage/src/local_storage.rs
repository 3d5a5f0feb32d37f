//! Browser `localStorage` backend

use crate::backend::KeyValueBackend;
use crate::error::{Result, StorageError};
use web_sys::Storage;

/// `window.localStorage`
///
/// `localStorage` throws in private browsing modes and when the quota is
/// exhausted; those exceptions surface as `StorageError`s.
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    /// Bind to the current window's `localStorage`
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::unavailable("no global window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::unavailable("localStorage disabled"))?;

        Ok(Self { storage })
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::backend(format!("getItem failed: {e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::backend(format!("setItem failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::backend(format!("removeItem failed: {e:?}")))
    }
}
