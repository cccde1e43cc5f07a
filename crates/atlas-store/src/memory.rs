use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::kv::LocalStorage;

/// Process-local storage backend. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.keys().cloned().collect())
    }
}
