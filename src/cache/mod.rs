//! Cache Module
//!
//! Two-tier expiring key-value cache: a fast in-memory map in front of a
//! persistent backend, with per-entry TTL, rehydration and namespaced
//! clearing.

mod clock;
mod entry;
mod stats;
mod tiered;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use tiered::TieredCache;

// == Public Constants ==
/// Default prefix for keys written to the persistent tier.
pub const DEFAULT_NAMESPACE: &str = "petflix_cache_";
