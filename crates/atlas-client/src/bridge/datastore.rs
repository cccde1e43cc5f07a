use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use atlas_shared::BridgeError;

/// Key-value datastore provided by the host runtime.
///
/// Used only as a best-effort mirror of local storage.
#[async_trait]
pub trait HostDatastore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BridgeError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), BridgeError>;
}

/// In-process [`HostDatastore`] with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Direct read that bypasses failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    /// Direct write that bypasses failure injection.
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

#[async_trait]
impl HostDatastore for MemoryDatastore {
    async fn get(&self, key: &str) -> Result<Option<String>, BridgeError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BridgeError::new("datastore unavailable"));
        }
        let values = self
            .values
            .lock()
            .map_err(|_| BridgeError::new("datastore lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::new("datastore unavailable"));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| BridgeError::new("datastore lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryDatastore::new();
        store.set("atlas_user_profile", "{}").await.unwrap();
        assert_eq!(
            store.get("atlas_user_profile").await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryDatastore::new();
        store.set_fail_writes(true);
        assert!(store.set("k", "v").await.is_err());
        assert_eq!(store.peek("k"), None);

        store.insert("k", "v");
        store.set_fail_reads(true);
        assert!(store.get("k").await.is_err());
        assert_eq!(store.peek("k").as_deref(), Some("v"));
    }
}
