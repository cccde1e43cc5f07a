//! Dual-backend persistence for every entity the app keeps.
//!
//! Local storage is the durable source of truth and is always written first.
//! When the host datastore is present, mirrored keys are copied there as a
//! best-effort secondary. Failures on either side are logged and swallowed;
//! there are no retries and no rollback.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use atlas_store::{LocalStorage, LocalStorageExt};

use crate::bridge::HostDatastore;
use crate::error::PersistenceError;

/// Fixed keys of the flat storage namespace (before prefixing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Account,
    UserProfile,
    Activities,
    Products,
    SavedEmail,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::Account,
        StorageKey::UserProfile,
        StorageKey::Activities,
        StorageKey::Products,
        StorageKey::SavedEmail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StorageKey::Account => "account",
            StorageKey::UserProfile => "user_profile",
            StorageKey::Activities => "activities",
            StorageKey::Products => "products",
            StorageKey::SavedEmail => "saved_email",
        }
    }

    /// Keys copied to the host datastore when it is available.
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            StorageKey::UserProfile | StorageKey::Activities | StorageKey::Products
        )
    }
}

pub struct RecordStore {
    local: Arc<dyn LocalStorage>,
    host: Option<Arc<dyn HostDatastore>>,
    prefix: String,
}

impl RecordStore {
    pub fn new(
        local: Arc<dyn LocalStorage>,
        host: Option<Arc<dyn HostDatastore>>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            local,
            host,
            prefix: prefix.into(),
        }
    }

    pub fn full_key(&self, key: StorageKey) -> String {
        format!("{}{}", self.prefix, key.name())
    }

    pub fn host_available(&self) -> bool {
        self.host.is_some()
    }

    /// Write `value` locally, then mirror it to the host if applicable.
    pub async fn persist<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        let full_key = self.full_key(key);
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %full_key, error = %e, "failed to encode record, nothing written");
                return;
            }
        };

        if let Err(e) = self.write_local(&full_key, &raw) {
            warn!(key = %full_key, error = %e, "local storage write failed");
        }

        if !key.is_mirrored() {
            return;
        }
        if let Err(e) = self.write_host(&full_key, &raw).await {
            warn!(key = %full_key, error = %e, "host datastore mirror failed, keeping local copy");
        }
    }

    /// Write `value` to local storage only.
    pub fn persist_local<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) {
        let full_key = self.full_key(key);
        if let Err(e) = self.local.set_json(&full_key, value) {
            warn!(key = %full_key, error = %e, "local storage write failed");
        }
    }

    /// Read `key`, preferring a non-empty host copy of mirrored keys.
    ///
    /// Host errors and malformed host copies fall back to local storage.
    pub async fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        if key.is_mirrored() {
            let full_key = self.full_key(key);
            match self.read_host(&full_key).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => debug!(key = %full_key, "no host copy, reading local storage"),
                Err(e) => {
                    warn!(key = %full_key, error = %e, "host read failed, reading local storage")
                }
            }
        }
        self.load_local(key)
    }

    /// Read `key` from local storage. Malformed data reads as `None`.
    pub fn load_local<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let full_key = self.full_key(key);
        match self.local.get_json(&full_key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %full_key, error = %e, "discarding unreadable local value");
                None
            }
        }
    }

    pub fn remove_local(&self, key: StorageKey) {
        let full_key = self.full_key(key);
        match self.local.remove_item(&full_key) {
            Ok(removed) => debug!(key = %full_key, removed, "local key cleared"),
            Err(e) => warn!(key = %full_key, error = %e, "failed to clear local key"),
        }
    }

    /// Blank the host copy of a mirrored key. [`RecordStore::load`] treats an
    /// empty host value as absent.
    pub async fn clear_host(&self, key: StorageKey) {
        if !key.is_mirrored() {
            return;
        }
        let full_key = self.full_key(key);
        match self.write_host(&full_key, "").await {
            Ok(()) => debug!(key = %full_key, "host copy cleared"),
            Err(e) => warn!(key = %full_key, error = %e, "failed to clear host copy"),
        }
    }

    fn write_local(&self, full_key: &str, raw: &str) -> Result<(), PersistenceError> {
        self.local.set_item(full_key, raw)?;
        Ok(())
    }

    async fn write_host(&self, full_key: &str, raw: &str) -> Result<(), PersistenceError> {
        if let Some(host) = &self.host {
            host.set(full_key, raw).await?;
        }
        Ok(())
    }

    async fn read_host<T: DeserializeOwned>(
        &self,
        full_key: &str,
    ) -> Result<Option<T>, PersistenceError> {
        let Some(host) = &self.host else {
            return Ok(None);
        };
        match host.get(full_key).await? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }
}
