//! Fetch Orchestrator Module
//!
//! Wraps arbitrary async fetch operations, keyed by cache key, with a
//! cache-first fast path and deduplication of concurrent fetches. The
//! point is quota: N concurrent callers asking for the same key must cost
//! exactly one outbound request.
//!
//! The check-then-insert on the pending map happens under one mutex, never
//! held across an await, so the single-fetch-per-key guarantee holds on a
//! multi-threaded runtime. The underlying fetch runs in a spawned task:
//! callers abandoning the result do not cancel it, and a late success
//! still populates the cache for whoever asks next.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::TieredCache;
use crate::error::{FetchError, FetchResult};

/// An in-flight fetch that any number of callers can await.
type SharedFetch = Shared<BoxFuture<'static, FetchResult<Value>>>;

// == Fetch Orchestrator ==
/// Deduplicating, cache-backed front for a rate-limited fetch API.
pub struct FetchOrchestrator {
    cache: Arc<TieredCache>,
    /// key -> in-flight fetch; at most one entry per key, removed when the
    /// fetch settles
    pending: Arc<Mutex<HashMap<String, SharedFetch>>>,
    /// Optional deadline applied around each fetch
    fetch_timeout: Option<Duration>,
}

impl FetchOrchestrator {
    // == Constructor ==
    /// Creates an orchestrator over the given cache, with no fetch timeout.
    pub fn new(cache: Arc<TieredCache>) -> Self {
        Self {
            cache,
            pending: Arc::new(Mutex::new(HashMap::new())),
            fetch_timeout: None,
        }
    }

    /// Applies a deadline to every fetch, so a hung upstream cannot hold a
    /// pending entry (and block refetches for its key) forever.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Returns the cache this orchestrator populates.
    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    // == Fetch With Cache ==
    /// Resolves `key` to a value: cached if possible, joining an in-flight
    /// fetch if one exists, otherwise invoking `fetch_fn` exactly once.
    ///
    /// On success the result is cached for `ttl_seconds`. On failure the
    /// error reaches every caller that joined the fetch, nothing is
    /// cached, and the next call for the key starts a fresh fetch.
    ///
    /// An empty key cannot be cached, so every call with one degrades to
    /// an uncached (but still deduplicated) fetch.
    ///
    /// # Arguments
    /// * `key` - Cache key identifying the operation and its parameters
    /// * `ttl_seconds` - TTL for a successful result, per data category
    /// * `fetch_fn` - Produces the future performing the outbound request
    pub async fn fetch_with_cache<F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        fetch_fn: F,
    ) -> FetchResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<Value>> + Send + 'static,
    {
        if key.is_empty() {
            warn!("fetching with empty key; result cannot be cached");
        }

        // Fast path: a valid cache entry costs no quota at all.
        if let Some(value) = self.cache.get(key) {
            debug!(key, "cache hit; fetch skipped");
            return Ok(value);
        }

        let shared = {
            let mut pending = self.pending.lock().expect("pending map mutex poisoned");
            if let Some(in_flight) = pending.get(key) {
                debug!(key, "joining in-flight fetch");
                in_flight.clone()
            } else {
                // The entry must be in the map before this lock is
                // released; a second caller racing us sees it and joins.
                let shared = self.spawn_fetch(key.to_string(), ttl_seconds, fetch_fn());
                pending.insert(key.to_string(), shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Drives the fetch in its own task and returns a joinable handle to
    /// its outcome.
    fn spawn_fetch<Fut>(&self, key: String, ttl_seconds: u64, fut: Fut) -> SharedFetch
    where
        Fut: Future<Output = FetchResult<Value>> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let pending = Arc::clone(&self.pending);
        let fetch_timeout = self.fetch_timeout;

        let handle = tokio::spawn(async move {
            // A panicking fetch must still reach the cleanup below, or the
            // key would keep a settled future in the map forever.
            let guarded = std::panic::AssertUnwindSafe(fut).catch_unwind();

            let result = match fetch_timeout {
                Some(limit) => match tokio::time::timeout(limit, guarded).await {
                    Ok(settled) => settled,
                    Err(_) => Ok(Err(FetchError::Timeout(limit.as_secs()))),
                },
                None => guarded.await,
            }
            .unwrap_or_else(|_| Err(FetchError::Aborted("fetch panicked".to_string())));

            match &result {
                Ok(value) => {
                    cache.set(&key, value.clone(), ttl_seconds);
                    debug!(key = key.as_str(), "fetch succeeded; result cached");
                }
                Err(e) => {
                    warn!(key = key.as_str(), error = %e, "fetch failed; nothing cached");
                }
            }

            // Unconditional cleanup: a settled future left in the map
            // would wedge the key for good after a failure.
            pending
                .lock()
                .expect("pending map mutex poisoned")
                .remove(&key);

            result
        });

        handle
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(FetchError::Aborted(e.to_string())),
            })
            .boxed()
            .shared()
    }

    // == Pending Count ==
    /// Returns the number of fetches currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("pending map mutex poisoned").len()
    }
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("pending", &self.pending_count())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}
