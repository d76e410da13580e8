//! Fetch Module
//!
//! Turns expensive, rate-limited fetches into idempotent cache-backed
//! accessors: cache-first lookup, deduplication of concurrent fetches for
//! the same key, cache population on success and error propagation without
//! caching.

mod keys;
mod orchestrator;

// Re-export public types
pub use keys::{playlist_items_key, search_key, video_key, DataCategory};
pub use orchestrator::FetchOrchestrator;
