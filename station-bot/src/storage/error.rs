//! State storage error types.

/// Errors that can occur when loading or storing progress.
///
/// None of these are recoverable by the caller: a failed load must never
/// be treated as an empty history, and a failed store means the change
/// was not recorded.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the state file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored snapshot could not be decoded, or the state could not be encoded
    #[error("invalid state snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Talking to Redis failed
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The storage backend is misconfigured
    #[error("storage configuration error: {message}")]
    Config { message: String },
}
