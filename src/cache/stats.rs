//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits per tier, misses, expired
//! evictions and persistent-tier failures.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the in-memory tier
    pub memory_hits: u64,
    /// Lookups answered from the persistent tier (and rehydrated)
    pub rehydrations: u64,
    /// Lookups that found nothing usable in either tier
    pub misses: u64,
    /// Entries dropped because their TTL had elapsed
    pub expired_evictions: u64,
    /// Persistent-tier operations that failed and were swallowed
    pub persistence_errors: u64,
    /// Current number of entries in the in-memory tier
    pub memory_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the overall hit rate across both tiers.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups happened.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.rehydrations;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    // == Record Memory Hit ==
    /// Increments the in-memory hit counter.
    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    // == Record Rehydration ==
    /// Increments the persistent-tier hit counter.
    pub fn record_rehydration(&mut self) {
        self.rehydrations += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expired Eviction ==
    /// Increments the expired-eviction counter.
    pub fn record_expired_eviction(&mut self) {
        self.expired_evictions += 1;
    }

    // == Record Persistence Error ==
    /// Increments the swallowed persistent-tier failure counter.
    pub fn record_persistence_error(&mut self) {
        self.persistence_errors += 1;
    }

    // == Update Entry Count ==
    /// Updates the in-memory entry count.
    pub fn set_memory_entries(&mut self, count: usize) {
        self.memory_entries = count;
    }
}
