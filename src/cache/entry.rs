//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//! Entries are serializable so the persistent tier can store them as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single cached payload with its expiry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored payload (search results, video metadata, ...)
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` after `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The payload to store
    /// * `now_ms` - Current Unix timestamp in milliseconds
    /// * `ttl_seconds` - TTL in seconds
    pub fn new(value: Value, now_ms: u64, ttl_seconds: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            expires_at: now_ms + ttl_seconds * 1000,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so a read exactly at
    /// `stored_at + ttl` already misses.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds at `now_ms`.
    ///
    /// Returns 0 once the entry has expired. Useful for diagnostics and
    /// stats reporting.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }
}
