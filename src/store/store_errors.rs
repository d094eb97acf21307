use thiserror::Error;

/// Custom error type for key-value store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open store at '{0}': {1}")]
    OpenFailed(String, String),

    #[error("Store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Failed to (de)serialize stored value: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store connection lock was poisoned")]
    LockPoisoned,
}
