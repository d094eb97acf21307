use thiserror::Error;

/// Custom error type for sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Fetch(err.to_string())
    }
}

impl From<SyncError> for String {
    fn from(error: SyncError) -> Self {
        error.to_string()
    }
}
