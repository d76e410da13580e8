//! File Storage Backend
//!
//! Durable persistent tier: one file per key under a directory, surviving
//! process restarts. Filenames are the hex encoding of the key bytes so
//! arbitrary key strings (queries, playlist ids) stay filesystem-safe.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::storage::StorageBackend;

/// Extension for entry files; anything else in the directory is ignored.
const ENTRY_EXT: &str = "json";

// == File Backend ==
/// Directory-backed storage with an optional total-byte quota.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    /// Maximum total bytes across all entry files; None = unbounded
    max_bytes: Option<u64>,
}

impl FileBackend {
    // == Constructors ==
    /// Opens (creating if needed) a file backend rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_bytes: None,
        })
    }

    /// Opens a backend that rejects writes once `max_bytes` of entry files
    /// are stored.
    pub fn open_with_quota(dir: impl Into<PathBuf>, max_bytes: u64) -> StorageResult<Self> {
        let mut backend = Self::open(dir)?;
        backend.max_bytes = Some(max_bytes);
        Ok(backend)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", hex::encode(key.as_bytes()), ENTRY_EXT))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }

    fn used_bytes(&self) -> StorageResult<u64> {
        let mut total = 0;
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            if Self::key_from_path(&dirent.path()).is_some() {
                total += dirent.metadata()?.len();
            }
        }
        Ok(total)
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(max) = self.max_bytes {
            let current = self.used_bytes()?;
            let replaced = fs::metadata(self.path_for(key)).map(|m| m.len()).unwrap_or(0);
            let projected = current - replaced + value.len() as u64;
            if projected > max {
                return Err(StorageError::QuotaExceeded(format!(
                    "{} bytes needed, {} allowed",
                    projected, max
                )));
            }
        }

        fs::write(self.path_for(key), value)?;
        debug!(key, "persisted entry file");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let dirent = dirent?;
            if let Some(key) = Self::key_from_path(&dirent.path()) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
