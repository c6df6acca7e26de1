/// Errors from cache-record operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The serialized bytes are not a valid cache record.
    #[error("cache record is corrupted: {0}")]
    Format(String),

    /// Error from the backing object database.
    #[error(transparent)]
    Storage(#[from] strata_storage::StorageError),

    /// I/O error from the backing filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for cache-record operations.
pub type CacheResult<T> = Result<T, CacheError>;
