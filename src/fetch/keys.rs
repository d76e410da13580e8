//! Cache Key Conventions
//!
//! Key shapes and per-category TTLs for the video API operations this
//! layer fronts. Keys are plain operation+parameter concatenations;
//! callers are free to bypass these helpers with their own strings.

use crate::config::Config;

// == Data Category ==
/// Category of fetched data, mapping to a TTL from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCategory {
    /// Search-query result lists (churn quickly)
    Search,
    /// Individual video or playlist metadata (stable)
    Metadata,
    /// Playlist item listings (in between)
    PlaylistItems,
}

impl DataCategory {
    /// Returns the configured TTL in seconds for this category.
    pub fn ttl_seconds(&self, config: &Config) -> u64 {
        match self {
            DataCategory::Search => config.search_ttl,
            DataCategory::Metadata => config.metadata_ttl,
            DataCategory::PlaylistItems => config.playlist_items_ttl,
        }
    }
}

// == Key Builders ==
/// Cache key for a search query.
pub fn search_key(query: &str) -> String {
    format!("search_{}", query)
}

/// Cache key for metadata of one or more videos.
pub fn video_key(video_ids: &[&str]) -> String {
    format!("video_{}", video_ids.join(","))
}

/// Cache key for the item listing of a playlist.
pub fn playlist_items_key(playlist_id: &str) -> String {
    format!("playlist_items_{}", playlist_id)
}
