//! The local storage contract shared by every backend.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Synchronous string key-value store scoped to one installation.
///
/// Writes are durable once the call returns.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Returns `true` if a value was removed.
    fn remove_item(&self, key: &str) -> Result<bool>;

    /// Every key currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// JSON helpers over any [`LocalStorage`].
pub trait LocalStorageExt: LocalStorage {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }
}

impl<S: LocalStorage + ?Sized> LocalStorageExt for S {}
