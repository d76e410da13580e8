//! Storage Module
//!
//! Persistent-tier backends for the cache. A backend is a synchronous
//! string-keyed key-value store with finite capacity; implementations may
//! refuse writes with a quota error. The cache never trusts a backend:
//! every call is wrapped and failures degrade into misses or no-ops.

mod backend;
mod file;
mod memory;

// Re-export public types
pub use backend::StorageBackend;
pub use file::FileBackend;
pub use memory::MemoryBackend;
