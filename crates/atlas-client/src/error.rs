use thiserror::Error;

use atlas_shared::BridgeError;
use atlas_store::StoreError;

/// Failure of a single persistence step.
///
/// Never leaves the record store: every occurrence is logged and the
/// operation carries on with whatever copy survived.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Local storage error: {0}")]
    Local(#[from] StoreError),

    #[error("Host datastore error: {0}")]
    Host(#[from] BridgeError),

    #[error("Malformed stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    #[error("Push notifications are disabled for this build")]
    Disabled,

    #[error("Push notifications require the host app")]
    Unavailable,

    #[error("Push registration failed: {0}")]
    Bridge(#[from] BridgeError),
}
