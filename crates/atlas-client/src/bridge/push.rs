use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use atlas_shared::BridgeError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushInfo {
    /// Provider-side subscriber id, present once registered.
    pub subscriber_id: Option<String>,
}

/// A notification delivered by the host's receive callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: Option<String>,
    pub body: String,
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn info(&self) -> Result<PushInfo, BridgeError>;

    async fn register(&self) -> Result<(), BridgeError>;
}
