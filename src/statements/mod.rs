pub(crate) mod statements_errors;
pub(crate) mod statements_parser;

pub use statements_errors::StatementError;
pub use statements_parser::parse_statement;
