//! Configuration Module
//!
//! TTL policy and cache parameters, loaded from environment variables with
//! defaults matching the product's quota economics: search results churn
//! hourly, item metadata is stable for a day, playlist listings in between.

use std::env;

/// Cache layer configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults. TTLs are per data category and consumed by callers of the
/// orchestrator; the cache itself only honors the per-entry expiry it is
/// given.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for search-query results
    pub search_ttl: u64,
    /// TTL in seconds for individual video/playlist metadata
    pub metadata_ttl: u64,
    /// TTL in seconds for playlist item listings
    pub playlist_items_ttl: u64,
    /// Prefix for persistent-tier keys
    pub namespace: String,
    /// Background purge task interval in seconds
    pub purge_interval: u64,
    /// Deadline in seconds for a single fetch; None = no timeout
    pub fetch_timeout: Option<u64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SEARCH_TTL_SECS` - Search result TTL (default: 3600)
    /// - `METADATA_TTL_SECS` - Video/playlist metadata TTL (default: 86400)
    /// - `PLAYLIST_ITEMS_TTL_SECS` - Playlist listing TTL (default: 21600)
    /// - `CACHE_NAMESPACE` - Persistent key prefix (default: "petflix_cache_")
    /// - `PURGE_INTERVAL_SECS` - Purge frequency in seconds (default: 60)
    /// - `FETCH_TIMEOUT_SECS` - Fetch deadline in seconds (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            search_ttl: env::var("SEARCH_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_ttl),
            metadata_ttl: env::var("METADATA_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metadata_ttl),
            playlist_items_ttl: env::var("PLAYLIST_ITEMS_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.playlist_items_ttl),
            namespace: env::var("CACHE_NAMESPACE").unwrap_or(defaults.namespace),
            purge_interval: env::var("PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
            fetch_timeout: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_ttl: 3600,
            metadata_ttl: 86_400,
            playlist_items_ttl: 21_600,
            namespace: crate::cache::DEFAULT_NAMESPACE.to_string(),
            purge_interval: 60,
            fetch_timeout: None,
        }
    }
}
