//! Error types for storage backends.

/// Errors a [`StorageBackend`](crate::StorageBackend) can report.
///
/// These never escape the store layer — [`SessionStore`](crate::SessionStore)
/// logs them and normalizes to "no session" / no-op, per the failure
/// contract in the crate docs.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying storage medium failed to read or write.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend is unusable (e.g. its internal lock was poisoned).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
