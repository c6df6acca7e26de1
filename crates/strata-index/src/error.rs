use strata_types::Key;

/// Errors from index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The key is absent from the index.
    #[error("key not found: {0:?}")]
    KeyNotFound(Key),

    /// A directory listing was requested for a non-directory key.
    #[error("not a directory: {0:?}")]
    NotADirectory(Key),

    /// Error from a storage backend.
    #[error(transparent)]
    Storage(#[from] strata_storage::StorageError),

    /// I/O error from a filesystem probe.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
