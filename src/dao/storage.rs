use std::error::Error;
use thiserror::Error;

/// Result alias for record store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by record store backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend cannot be reached or rejected the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable description of the failed operation.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A write targeted a row that does not exist.
    #[error("missing record: {0}")]
    MissingRecord(String),
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
