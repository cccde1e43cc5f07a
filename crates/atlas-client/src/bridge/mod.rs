//! Capabilities supplied by the mobile WebView host.
//!
//! Each capability is optional. A plain browser has none of them; the host
//! runtime may provide any subset. The set is chosen once at startup and held
//! in a [`HostBridge`] for the lifetime of the app.

pub mod biometric;
pub mod confirm;
pub mod datastore;
pub mod push;

use std::sync::Arc;

pub use biometric::{BiometricProvider, BiometricSecret, BiometricStatus};
pub use confirm::Confirm;
pub use datastore::{HostDatastore, MemoryDatastore};
pub use push::{PushInfo, PushNotification, PushProvider};

#[derive(Clone, Default)]
pub struct HostBridge {
    pub biometric: Option<Arc<dyn BiometricProvider>>,
    pub datastore: Option<Arc<dyn HostDatastore>>,
    pub push: Option<Arc<dyn PushProvider>>,
}

impl HostBridge {
    /// No host runtime: everything stays in local storage.
    pub fn browser() -> Self {
        Self::default()
    }

    pub fn with_biometric(mut self, provider: Arc<dyn BiometricProvider>) -> Self {
        self.biometric = Some(provider);
        self
    }

    pub fn with_datastore(mut self, datastore: Arc<dyn HostDatastore>) -> Self {
        self.datastore = Some(datastore);
        self
    }

    pub fn with_push(mut self, provider: Arc<dyn PushProvider>) -> Self {
        self.push = Some(provider);
        self
    }

    /// Whether any host capability is present.
    pub fn is_host(&self) -> bool {
        self.biometric.is_some() || self.datastore.is_some() || self.push.is_some()
    }
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("biometric", &self.biometric.is_some())
            .field("datastore", &self.datastore.is_some())
            .field("push", &self.push.is_some())
            .finish()
    }
}
