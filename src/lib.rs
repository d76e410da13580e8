//! Petflix Cache - a quota-saving caching layer for rate-limited APIs
//!
//! Combines a two-tier expiring key-value cache (fast in-memory tier plus
//! a persistent tier that survives restarts) with a fetch orchestrator
//! that deduplicates concurrent requests for the same key, so N callers
//! cost exactly one outbound API call.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod storage;
pub mod tasks;

pub use cache::{CacheStats, Clock, ManualClock, SystemClock, TieredCache};
pub use config::Config;
pub use error::{FetchError, StorageError};
pub use fetch::FetchOrchestrator;
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use tasks::spawn_purge_task;
