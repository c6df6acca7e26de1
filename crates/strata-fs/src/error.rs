/// Errors from virtual filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// The path is absent from the index, or no backing tier had an
    /// existing file for it.
    #[error("no storage files available: {0:?}")]
    NotFound(String),

    /// A read or transfer targeted a directory path.
    #[error("is a directory: {0:?}")]
    IsADirectory(String),

    /// A directory listing targeted a file path.
    #[error("not a directory: {0:?}")]
    NotADirectory(String),

    /// The entry's metadata does not support the requested operation.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Error from a storage backend.
    #[error(transparent)]
    Storage(#[from] strata_storage::StorageError),

    /// I/O error from an underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for virtual filesystem operations.
pub type FsResult<T> = Result<T, FsError>;
