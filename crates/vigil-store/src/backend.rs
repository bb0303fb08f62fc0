//! Storage backends: where the raw record string actually lives.
//!
//! The store logic doesn't care whether the record sits in a browser-style
//! key-value slot, a file, or test memory — it only needs three operations
//! on a single key. That contract is the [`StorageBackend`] trait.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::StoreError;

/// A single-key string store.
///
/// `Send + Sync + 'static` because the backend is shared with the
/// long-lived session owner and may be touched from the runtime task.
pub trait StorageBackend: Send + Sync + 'static {
    /// Reads the raw record. `Ok(None)` means the key is absent — that is
    /// a normal state, not an error.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Overwrites the raw record. Must be atomic from the caller's
    /// perspective: a reader never observes a partial write.
    fn write(&self, raw: &str) -> Result<(), StoreError>;

    /// Deletes the record. Idempotent — removing an absent key succeeds.
    fn remove(&self) -> Result<(), StoreError>;
}

// Lets builders hold a `Box<dyn StorageBackend>` and still hand it to
// anything that wants `impl StorageBackend`.
impl StorageBackend for Box<dyn StorageBackend> {
    fn read(&self) -> Result<Option<String>, StoreError> {
        (**self).read()
    }

    fn write(&self, raw: &str) -> Result<(), StoreError> {
        (**self).write(raw)
    }

    fn remove(&self) -> Result<(), StoreError> {
        (**self).remove()
    }
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// An in-memory slot. The default for tests and for embedding where
/// durability isn't wanted.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StoreError> {
        self.slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory slot lock poisoned".into()))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, raw: &str) -> Result<(), StoreError> {
        *self.lock()? = Some(raw.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileBackend
// ---------------------------------------------------------------------------

/// A single JSON file on disk.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// target. Rename is atomic on the same filesystem, so a crash mid-write
/// leaves either the old record or the new one — never a torn file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing the record at `path`. The file does not
    /// need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, raw: &str) -> Result<(), StoreError> {
        let tmp = self.temp_path();
        fs::write(&tmp, raw)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            // Don't leave the temp file behind on a failed rename.
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
