/// Errors from key-value backend operations.
///
/// These never reach engine components: [`crate::KvStore`] absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is empty or contains characters the backend cannot store.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes are not valid UTF-8 text.
    #[error("value for {key} is not valid text")]
    Encoding { key: String },

    /// The backend refused the write because it is full.
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    /// Storage is disabled or otherwise unreachable.
    #[error("storage unavailable")]
    Unavailable,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
