use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Result;

/// Contract for the persisted key-value store. Values are serialized JSON
/// documents with dates encoded as ISO-8601 strings.
pub trait StoreTrait: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn put_raw(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

/// Reads and revives a typed value from the store.
pub fn get_value<T: DeserializeOwned>(store: &dyn StoreTrait, key: &str) -> Result<Option<T>> {
    match store.get_raw(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes and writes a typed value to the store.
pub fn put_value<T: Serialize>(store: &dyn StoreTrait, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put_raw(key, &raw)
}
