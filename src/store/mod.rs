pub(crate) mod sqlite_store;
pub(crate) mod store_errors;
pub(crate) mod store_traits;

pub use sqlite_store::SqliteStore;
pub use store_errors::StoreError;
pub use store_traits::{get_value, put_value, StoreTrait};
