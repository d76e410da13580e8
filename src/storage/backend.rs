//! Storage Backend Trait
//!
//! The seam between the cache and whatever persists its entries across
//! restarts. Kept synchronous and string-valued on purpose: backends are
//! local stores (files, embedded KV), not network services.

use crate::error::StorageResult;

// == Storage Backend ==
/// A synchronous string-keyed persistent store.
///
/// Implementations must be safe to share across threads; the cache calls
/// them from whatever task is performing a lookup or write.
pub trait StorageBackend: Send + Sync {
    /// Reads the raw value for a key, `None` if absent.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a raw value under a key, overwriting any previous value.
    ///
    /// May fail with `StorageError::QuotaExceeded` when the backend's
    /// capacity would be exceeded.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Enumerates every stored key, in no particular order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
