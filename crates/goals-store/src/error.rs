// error.rs: Error types for goal persistence.

use thiserror::Error;

/// Errors that can occur while reading or writing goal records.
///
/// The API layer does not distinguish between variants: any of them means
/// the store is unavailable for that request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize a goal document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
