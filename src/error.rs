//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.
//!
//! Two disjoint families exist here: `StorageError` covers the persistent
//! tier and is always caught at the cache boundary (logged, turned into a
//! miss or no-op), while `FetchError` covers the outbound fetch path and is
//! propagated verbatim to orchestrator callers.

use thiserror::Error;

// == Storage Error Enum ==
/// Errors raised by a persistent-tier backend.
///
/// These never escape the cache: every persistent read/write is wrapped so
/// a failure degrades into a cache miss or a memory-only write.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend capacity exhausted; the write was rejected
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Underlying I/O failure (file missing, permissions, disk error)
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be parsed back
    #[error("corrupted persisted entry: {0}")]
    Corrupted(String),
}

// == Fetch Error Enum ==
/// Errors produced by the outbound fetch path.
///
/// Cloneable on purpose: concurrent callers that joined the same in-flight
/// fetch all receive their own copy of the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be performed (network failure, DNS, transport)
    #[error("request failed: {0}")]
    Request(String),

    /// The upstream API answered with a non-success status
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The upstream answered but the body could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The fetch exceeded the configured deadline
    #[error("fetch timed out after {0} seconds")]
    Timeout(u64),

    /// The task driving the fetch stopped before producing a result
    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

// == Result Type Aliases ==
/// Convenience Result type for persistent-tier operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Convenience Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::QuotaExceeded("64 bytes over".to_string());
        assert!(err.to_string().contains("quota"));

        let err = StorageError::Corrupted("bad json".to_string());
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            status: 403,
            message: "quotaExceeded".to_string(),
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("quotaExceeded"));
    }

    #[test]
    fn test_fetch_error_is_clone() {
        let err = FetchError::Request("connection reset".to_string());
        let copy = err.clone();
        assert_eq!(err, copy);
    }

    #[test]
    fn test_storage_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
