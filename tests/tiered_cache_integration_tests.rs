//! Integration Tests for the Tiered Cache
//!
//! Exercises the two tiers through the public API: restart survival,
//! rehydration, namespaced clearing and fail-soft persistence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;

use petflix_cache::{
    Clock, FileBackend, ManualClock, MemoryBackend, StorageBackend, StorageError, TieredCache,
};

const NS: &str = "petflix_cache_";

// == Helper Functions ==

/// Initializes the tracing subscriber once for the whole suite.
/// Defaults to "petflix_cache=debug", can be overridden with RUST_LOG.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petflix_cache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

// == Helper Backends ==

/// Delegates to an inner backend but fails every read after the first,
/// proving that a rehydrated entry is served from memory afterwards.
struct FailAfterFirstRead {
    inner: MemoryBackend,
    reads: AtomicUsize,
}

impl FailAfterFirstRead {
    fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
        }
    }
}

impl StorageBackend for FailAfterFirstRead {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.reads.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(StorageError::Corrupted("backend gone".to_string()));
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }
}

fn test_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "petflix-cache-it-{}-{}",
        name,
        std::process::id()
    ))
}

// == Rehydration ==

#[test]
fn test_rehydration_survives_memory_loss() {
    init_tracing();
    let backend = MemoryBackend::new();
    let clock = Arc::new(ManualClock::starting_at(0));

    // Seed the persistent tier directly, as a previous session's cache
    // would have left it; the memory tier starts empty (a reload analog).
    let entry = json!({
        "value": {"title": "Dogs"},
        "stored_at": 0,
        "expires_at": 600_000
    });
    backend
        .write("petflix_cache_video_abc", &entry.to_string())
        .unwrap();

    let wrapper = Arc::new(FailAfterFirstRead::new(backend));
    let cache = TieredCache::new(
        wrapper as Arc<dyn StorageBackend>,
        clock as Arc<dyn Clock>,
        NS,
    );

    // First read comes from the persistent tier and rehydrates memory
    assert_eq!(cache.get("video_abc"), Some(json!({"title": "Dogs"})));
    assert_eq!(cache.stats().rehydrations, 1);

    // Second read must not touch the (now throwing) persistent tier
    assert_eq!(cache.get("video_abc"), Some(json!({"title": "Dogs"})));
    assert_eq!(cache.stats().memory_hits, 1);
}

// == Namespaced Clear ==

#[test]
fn test_clear_spares_unrelated_persisted_data() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let clock = Arc::new(ManualClock::starting_at(0));
    let cache = TieredCache::new(
        backend.clone() as Arc<dyn StorageBackend>,
        clock as Arc<dyn Clock>,
        NS,
    );

    backend.write("other_app_setting", "dark-mode").unwrap();
    cache.set("search_x", json!([1, 2, 3]), 10);

    cache.clear();

    assert_eq!(
        backend.read("other_app_setting").unwrap(),
        Some("dark-mode".to_string())
    );
    assert_eq!(cache.get("search_x"), None);
}

// == Expiry End To End ==

#[test]
fn test_metadata_expires_after_a_day() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>;
    let clock = Arc::new(ManualClock::starting_at(1_700_000_000_000));
    let cache = TieredCache::new(backend, clock.clone() as Arc<dyn Clock>, NS);

    cache.set("video_abc", json!({"title": "Dogs"}), 86_400);
    assert_eq!(cache.get("video_abc"), Some(json!({"title": "Dogs"})));

    clock.advance_secs(86_401);
    assert_eq!(cache.get("video_abc"), None);
}

// == File Backend End To End ==

#[test]
fn test_file_backend_survives_restart() {
    init_tracing();
    let dir = test_dir("restart");
    let _ = std::fs::remove_dir_all(&dir);
    let clock = Arc::new(ManualClock::starting_at(0));

    {
        let backend = Arc::new(FileBackend::open(&dir).unwrap()) as Arc<dyn StorageBackend>;
        let cache = TieredCache::new(backend, clock.clone() as Arc<dyn Clock>, NS);
        cache.set("search_good boys", json!([{"id": "v1"}]), 3600);
    }

    // New backend and cache over the same directory: a process restart
    let backend = Arc::new(FileBackend::open(&dir).unwrap()) as Arc<dyn StorageBackend>;
    let cache = TieredCache::new(backend, clock as Arc<dyn Clock>, NS);

    assert_eq!(cache.get("search_good boys"), Some(json!([{"id": "v1"}])));

    std::fs::remove_dir_all(&dir).unwrap();
}

// == Fail-Soft Persistence ==

#[test]
fn test_quota_exhaustion_never_breaks_set() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::with_quota(120));
    let clock = Arc::new(ManualClock::starting_at(0));
    let cache = TieredCache::new(
        backend.clone() as Arc<dyn StorageBackend>,
        clock as Arc<dyn Clock>,
        NS,
    );

    // Keep writing until the quota must have been blown; set never fails
    for i in 0..20 {
        cache.set(&format!("search_{}", i), json!({"n": i}), 60);
    }

    // Every entry is still readable from the memory tier
    for i in 0..20 {
        assert_eq!(cache.get(&format!("search_{}", i)), Some(json!({"n": i})));
    }
    assert!(cache.stats().persistence_errors > 0);
}
