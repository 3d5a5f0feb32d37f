//! Key/value media the progress mapping is persisted to

use crate::error::{Result, StorageError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A durable string key/value medium
///
/// Mirrors the browser `localStorage` surface: values are whole strings,
/// reads of absent keys yield `None`, and every call may fail (quota,
/// private browsing, permission errors).
pub trait KeyValueBackend {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local backend, lost on exit
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.entries.borrow_mut().insert(key.into(), value.into());
        backend
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One file per key inside a data directory
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` as the data directory; it is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value of `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.tmp", sanitize_key(key)));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Keep keys usable as file names
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
