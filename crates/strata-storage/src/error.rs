/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An object id does not have the expected shape.
    #[error("invalid object id: {0:?}")]
    InvalidOid(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
