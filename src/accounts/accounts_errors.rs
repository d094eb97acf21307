use thiserror::Error;

/// Custom error type for account-related operations
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<AccountError> for String {
    fn from(error: AccountError) -> Self {
        error.to_string()
    }
}
