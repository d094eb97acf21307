use thiserror::Error;

use crate::accounts::AccountError;
use crate::statements::StatementError;
use crate::store::StoreError;
use crate::sync::SyncError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the trading-journal engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Statement parsing failed: {0}")]
    Statement(#[from] StatementError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

// Map low-level store failures directly onto the root error
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(StoreError::Query(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(StoreError::Serde(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Sync(SyncError::from(err))
    }
}
