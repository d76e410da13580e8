//! In-Memory Storage Backend
//!
//! A mutex-protected map behaving like a real persistent store, including
//! an optional byte quota. Used by tests and as a degraded memory-only
//! mode when no durable backend is available.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StorageError, StorageResult};
use crate::storage::StorageBackend;

// == Memory Backend ==
/// Map-backed storage with an optional total-byte quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    /// Maximum total bytes (keys + values); None = unbounded
    max_bytes: Option<usize>,
}

impl MemoryBackend {
    // == Constructors ==
    /// Creates an unbounded in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes once `max_bytes` of keys and
    /// values are stored, mimicking a quota-limited store.
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_bytes: Some(max_bytes),
        }
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");

        if let Some(max) = self.max_bytes {
            // Bytes after the write, accounting for an overwritten value
            let current = Self::used_bytes(&entries);
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = current - replaced + key.len() + value.len();
            if projected > max {
                return Err(StorageError::QuotaExceeded(format!(
                    "{} bytes needed, {} allowed",
                    projected, max
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        Ok(entries.keys().cloned().collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let backend = MemoryBackend::new();

        backend.write("k1", "v1").unwrap();
        assert_eq!(backend.read("k1").unwrap(), Some("v1".to_string()));
        assert_eq!(backend.read("missing").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let backend = MemoryBackend::new();

        backend.write("k", "old").unwrap();
        backend.write("k", "new").unwrap();
        assert_eq!(backend.read("k").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_remove() {
        let backend = MemoryBackend::new();

        backend.write("k", "v").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.read("k").unwrap(), None);

        // Removing an absent key is fine
        backend.remove("k").unwrap();
    }

    #[test]
    fn test_keys_enumeration() {
        let backend = MemoryBackend::new();

        backend.write("a", "1").unwrap();
        backend.write("b", "2").unwrap();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let backend = MemoryBackend::with_quota(10);

        backend.write("ab", "cd").unwrap(); // 4 bytes used

        let result = backend.write("key", "too-long-value");
        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));

        // Existing data untouched
        assert_eq!(backend.read("ab").unwrap(), Some("cd".to_string()));
    }

    #[test]
    fn test_quota_accounts_for_overwrite() {
        let backend = MemoryBackend::with_quota(10);

        backend.write("k", "aaaaaaaa").unwrap(); // 9 bytes
        // Overwriting with a shorter value must not be rejected
        backend.write("k", "b").unwrap();
        assert_eq!(backend.read("k").unwrap(), Some("b".to_string()));
    }
}
