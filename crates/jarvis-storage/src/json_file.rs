//! A JSON array persisted in a single file.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use jarvis_core::error::{JarvisError, Result};

/// A `Vec<T>` stored as a pretty-printed JSON array.
///
/// Missing, empty or unparsable files read as an empty array. Every
/// read-modify-write goes through one mutex, so concurrent updates from
/// the same process never lose entries.
pub struct JsonArrayFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonArrayFile<T> {
    /// Open `path`, creating parent directories and an empty array if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            std::fs::write(&path, "[]")?;
            tracing::debug!(path = %path.display(), "Created empty JSON array file");
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents.
    pub fn load(&self) -> Vec<T> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        self.read()
    }

    /// Apply `f` to the contents and write the result back.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> Result<R> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| JarvisError::Storage(format!("file lock poisoned: {}", e)))?;
        let mut items = self.read();
        let out = f(&mut items);
        self.write(&items)?;
        Ok(out)
    }

    /// Replace the contents with an empty array.
    pub fn clear(&self) -> Result<()> {
        self.update(|items| items.clear())
    }

    fn read(&self) -> Vec<T> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read data file");
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Data file is not a valid JSON array, treating as empty"
            );
            Vec::new()
        })
    }

    fn write(&self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
