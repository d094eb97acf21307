pub(crate) mod sync_errors;
pub(crate) mod sync_fetcher;
pub(crate) mod sync_model;
pub(crate) mod sync_service;
pub(crate) mod sync_traits;

pub use sync_errors::SyncError;
pub use sync_fetcher::HttpFetcher;
pub use sync_model::SyncRunSummary;
pub use sync_service::SyncService;
pub use sync_traits::RemoteFetcherTrait;
