use thiserror::Error;

/// Custom error type for statement-parsing operations. Only file-level
/// defects are fatal; malformed individual rows are skipped by the parser.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Statement must contain a header line and at least one data row")]
    NotEnoughLines,
    #[error("Statement is missing required columns: {0}")]
    MissingColumns(String),
}

impl From<StatementError> for String {
    fn from(error: StatementError) -> Self {
        error.to_string()
    }
}
