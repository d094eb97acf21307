use async_trait::async_trait;

use crate::errors::Result;

/// Contract for fetching an account's remote statement source.
#[async_trait]
pub trait RemoteFetcherTrait: Send + Sync {
    /// Returns the freshest bytes of the statement behind `url`.
    async fn fetch_statement(&self, url: &str) -> Result<String>;
}
