//! Tiered Cache Module
//!
//! The two-tier cache engine: a fast in-memory map in front of a slower
//! persistent backend that survives restarts. The cache owns entry
//! lifetime (expiry eviction, rehydration, namespaced clearing) and is
//! fail-soft: no persistent-tier failure ever reaches a caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, Clock};
use crate::storage::StorageBackend;

// == Tiered Cache ==
/// Two-tier expiring key-value cache.
///
/// Lookups go memory-first; a valid persistent hit is rehydrated into the
/// memory tier so later lookups skip the slow tier. Persistent keys are
/// namespaced under a fixed prefix so `clear` can bulk-remove this cache's
/// entries without disturbing unrelated persisted data.
pub struct TieredCache {
    /// Fast tier
    memory: Mutex<HashMap<String, CacheEntry>>,
    /// Slow tier, injected by the composition root
    persistent: Arc<dyn StorageBackend>,
    /// Time source, injected so expiry is testable
    clock: Arc<dyn Clock>,
    /// Prefix for every key written to the persistent tier
    namespace: String,
    /// Performance counters
    stats: Mutex<CacheStats>,
}

impl TieredCache {
    // == Constructor ==
    /// Creates a cache over the given backend and clock.
    ///
    /// # Arguments
    /// * `persistent` - Persistent-tier backend
    /// * `clock` - Time source used for expiry decisions
    /// * `namespace` - Prefix for persistent-tier keys
    pub fn new(
        persistent: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            persistent,
            clock,
            namespace: namespace.into(),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    fn persistent_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    // == Set ==
    /// Stores a value under `key`, expiring `ttl_seconds` from now.
    ///
    /// The memory tier is written unconditionally. The persistent write is
    /// best-effort: quota, serialization or I/O failures are logged and
    /// swallowed, leaving the memory tier as the only copy. Never fails.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) {
        if key.is_empty() {
            warn!("ignoring cache write with empty key");
            return;
        }

        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_seconds);

        {
            let mut memory = self.memory.lock().expect("memory tier mutex poisoned");
            memory.insert(key.to_string(), entry.clone());
            self.lock_stats().set_memory_entries(memory.len());
        }

        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.persistent.write(&self.persistent_key(key), &raw) {
                    warn!(key, error = %e, "persistent write failed; entry kept in memory only");
                    self.lock_stats().record_persistence_error();
                }
            }
            Err(e) => {
                warn!(key, error = %e, "entry not serializable; kept in memory only");
                self.lock_stats().record_persistence_error();
            }
        }
    }

    // == Get ==
    /// Retrieves the value for `key`, or `None` when nothing unexpired is
    /// cached.
    ///
    /// Memory tier first; an expired memory entry is evicted and the
    /// persistent tier consulted. A valid persistent hit is rehydrated
    /// into memory. Corrupt or expired persistent entries are removed.
    /// Persistent-tier failures are logged and count as a miss. Never
    /// fails.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        {
            let mut memory = self.memory.lock().expect("memory tier mutex poisoned");
            if let Some(entry) = memory.get(key) {
                if entry.is_expired(now) {
                    memory.remove(key);
                    let mut stats = self.lock_stats();
                    stats.record_expired_eviction();
                    stats.set_memory_entries(memory.len());
                    // fall through to the persistent tier
                } else {
                    self.lock_stats().record_memory_hit();
                    return Some(entry.value.clone());
                }
            }
        }

        match self.read_persistent(key, now) {
            Some(entry) => {
                let value = entry.value.clone();
                let mut memory = self.memory.lock().expect("memory tier mutex poisoned");
                memory.insert(key.to_string(), entry);
                let mut stats = self.lock_stats();
                stats.record_rehydration();
                stats.set_memory_entries(memory.len());
                Some(value)
            }
            None => {
                self.lock_stats().record_miss();
                None
            }
        }
    }

    /// Reads and validates a persistent-tier entry; `None` on any miss,
    /// expiry, corruption or backend failure.
    fn read_persistent(&self, key: &str, now: u64) -> Option<CacheEntry> {
        let pkey = self.persistent_key(key);

        let raw = match self.persistent.read(&pkey) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "persistent read failed; treating as miss");
                self.lock_stats().record_persistence_error();
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "corrupt persisted entry; removing");
                self.lock_stats().record_persistence_error();
                self.remove_persistent(&pkey);
                return None;
            }
        };

        if entry.is_expired(now) {
            debug!(key, "persisted entry expired; removing");
            self.lock_stats().record_expired_eviction();
            self.remove_persistent(&pkey);
            return None;
        }

        Some(entry)
    }

    fn remove_persistent(&self, pkey: &str) {
        if let Err(e) = self.persistent.remove(pkey) {
            warn!(key = pkey, error = %e, "persistent remove failed");
            self.lock_stats().record_persistence_error();
        }
    }

    // == Clear ==
    /// Empties the memory tier and removes every persistent key under this
    /// cache's namespace, leaving unrelated persisted data untouched.
    /// Best-effort; failures are logged.
    pub fn clear(&self) {
        {
            let mut memory = self.memory.lock().expect("memory tier mutex poisoned");
            memory.clear();
            self.lock_stats().set_memory_entries(0);
        }

        let keys = match self.persistent.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "persistent key enumeration failed during clear");
                self.lock_stats().record_persistence_error();
                return;
            }
        };

        for pkey in keys.iter().filter(|k| k.starts_with(&self.namespace)) {
            self.remove_persistent(pkey);
        }
        debug!("cache cleared");
    }

    // == Purge Expired ==
    /// Removes every expired entry from both tiers.
    ///
    /// Returns the number of distinct keys purged. Called periodically by
    /// the background purge task; `get` also evicts lazily, so this only
    /// bounds the footprint of keys that are never read again.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut purged: std::collections::HashSet<String> = std::collections::HashSet::new();

        {
            let mut memory = self.memory.lock().expect("memory tier mutex poisoned");
            memory.retain(|key, entry| {
                let expired = entry.is_expired(now);
                if expired {
                    purged.insert(key.clone());
                }
                !expired
            });
            let mut stats = self.lock_stats();
            for _ in 0..purged.len() {
                stats.record_expired_eviction();
            }
            stats.set_memory_entries(memory.len());
        }

        match self.persistent.keys() {
            Ok(keys) => {
                for pkey in keys.iter().filter(|k| k.starts_with(&self.namespace)) {
                    let expired = match self.persistent.read(pkey) {
                        Ok(Some(raw)) => serde_json::from_str::<CacheEntry>(&raw)
                            .map(|entry| entry.is_expired(now))
                            // unparseable entries are purged as well
                            .unwrap_or(true),
                        Ok(None) => false,
                        Err(e) => {
                            warn!(key = pkey.as_str(), error = %e, "persistent read failed during purge");
                            self.lock_stats().record_persistence_error();
                            false
                        }
                    };
                    if expired {
                        self.remove_persistent(pkey);
                        purged.insert(pkey[self.namespace.len()..].to_string());
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "persistent key enumeration failed during purge");
                self.lock_stats().record_persistence_error();
            }
        }

        purged.len()
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock_stats().clone()
    }

    // == Length ==
    /// Returns the number of entries in the memory tier.
    pub fn len(&self) -> usize {
        self.memory.lock().expect("memory tier mutex poisoned").len()
    }

    // == Is Empty ==
    /// Returns true if the memory tier is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, CacheStats> {
        self.stats.lock().expect("stats mutex poisoned")
    }
}

impl std::fmt::Debug for TieredCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredCache")
            .field("namespace", &self.namespace)
            .field("memory_entries", &self.len())
            .finish_non_exhaustive()
    }
}
