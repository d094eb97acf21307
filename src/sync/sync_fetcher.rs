use async_trait::async_trait;
use reqwest::header;

use super::sync_errors::SyncError;
use super::sync_traits::RemoteFetcherTrait;
use crate::errors::Result;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// HTTP(S) statement fetcher with cache-bypassing semantics.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(SyncError::from)?;
        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl RemoteFetcherTrait for HttpFetcher {
    async fn fetch_statement(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
