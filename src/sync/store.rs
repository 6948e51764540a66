use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::StoreError;

const VALUE_EXT: &str = "val";

/// A string key-value store shared by several instances, with change notification.
///
/// Each handle acts as one participant. Values are replaced whole on write.
/// [`SharedStore::external_changes`] reports keys written by *other*
/// participants since the previous call; a handle never sees its own writes.
pub trait SharedStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drain the changes other participants made to `keys`. Changes to any
    /// other key are dropped. Order follows arrival; a key may appear more
    /// than once.
    fn external_changes(&mut self, keys: &[&str]) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    pending: HashMap<usize, Vec<String>>,
    next_handle: usize,
}

/// In-process store. Every handle created with [`MemoryStore::connect`]
/// shares the same values and receives the writes of the others.
#[derive(Debug)]
pub struct MemoryStore {
    handle: usize,
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let inner = Arc::new(Mutex::new(MemoryInner::default()));
        let handle = register(&inner);
        MemoryStore { handle, inner }
    }

    /// A new participant on the same storage.
    pub fn connect(&self) -> Self {
        MemoryStore {
            handle: register(&self.inner),
            inner: Arc::clone(&self.inner),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn register(inner: &Arc<Mutex<MemoryInner>>) -> usize {
    let mut guard = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let handle = guard.next_handle;
    guard.next_handle += 1;
    guard.pending.insert(handle, Vec::new());
    handle
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.pending.remove(&self.handle);
        }
    }
}

impl SharedStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let handle = self.handle;
        let mut guard = self.lock()?;
        guard.values.insert(key.to_string(), value.to_string());
        for (other, queue) in guard.pending.iter_mut() {
            if *other != handle {
                queue.push(key.to_string());
            }
        }
        Ok(())
    }

    fn external_changes(&mut self, keys: &[&str]) -> Result<Vec<String>, StoreError> {
        let handle = self.handle;
        let mut guard = self.lock()?;
        let mut changed = guard
            .pending
            .get_mut(&handle)
            .map(std::mem::take)
            .unwrap_or_default();
        changed.retain(|key| keys.contains(&key.as_str()));
        Ok(changed)
    }
}

/// Store backed by a directory with one file per key.
///
/// Writes go to a temporary file that is then renamed over the value file,
/// so readers never see a half-written value. Changes by other processes are
/// found by comparing the raw contents of the polled keys with the last
/// contents this handle saw.
#[derive(Debug)]
pub struct DirStore {
    dir: PathBuf,
    seen: HashMap<String, Vec<u8>>,
}

impl DirStore {
    /// Open (and create if needed) a store directory. Values already present
    /// count as seen, so they are not reported as changes.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Scan {
            path: dir.clone(),
            source,
        })?;
        let mut store = DirStore {
            dir,
            seen: HashMap::new(),
        };
        store.seen = store.snapshot()?;
        debug!(dir = %store.dir.display(), keys = store.seen.len(), "opened store directory");
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXT}"))
    }

    /// Raw contents of every value file. Unreadable files are skipped.
    fn snapshot(&self) -> Result<HashMap<String, Vec<u8>>, StoreError> {
        let scan_err = |source| StoreError::Scan {
            path: self.dir.clone(),
            source,
        };
        let mut values = HashMap::new();
        for entry in fs::read_dir(&self.dir).map_err(scan_err)? {
            let path = entry.map_err(scan_err)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXT) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match self.read_bytes(key) {
                Ok(Some(value)) => {
                    values.insert(key.to_string(), value);
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "skipping unreadable value file"),
            }
        }
        Ok(values)
    }

    fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.value_path(key);
        match fs::read(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }
}

impl SharedStore for DirStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.value_path(key);
        let tmp = self
            .dir
            .join(format!(".{key}.{}.tmp", std::process::id()));
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };
        fs::write(&tmp, value).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        self.seen.insert(key.to_string(), value.as_bytes().to_vec());
        Ok(())
    }

    /// Only the files of `keys` are read, and only their contents are kept.
    fn external_changes(&mut self, keys: &[&str]) -> Result<Vec<String>, StoreError> {
        let mut current = HashMap::new();
        let mut changed = Vec::new();
        for &key in keys {
            let value = match self.read_bytes(key) {
                Ok(value) => value,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable value file");
                    if let Some(previous) = self.seen.remove(key) {
                        current.insert(key.to_string(), previous);
                    }
                    continue;
                }
            };
            if value.as_ref() != self.seen.get(key) {
                changed.push(key.to_string());
            }
            if let Some(value) = value {
                current.insert(key.to_string(), value);
            }
        }
        self.seen = current;
        Ok(changed)
    }
}
