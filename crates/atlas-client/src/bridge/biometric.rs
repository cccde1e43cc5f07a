use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use atlas_shared::{BiometricKind, BridgeError};

/// What the host reports about biometric hardware and the stored secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricStatus {
    pub has_face_id: bool,
    pub has_touch_id: bool,
    #[serde(alias = "hasSecret")]
    pub has_saved_secret: bool,
}

impl BiometricStatus {
    pub fn is_available(&self) -> bool {
        self.has_face_id || self.has_touch_id
    }

    /// Face ID wins when the host reports both.
    pub fn kind(&self) -> BiometricKind {
        if self.has_face_id {
            BiometricKind::FaceId
        } else if self.has_touch_id {
            BiometricKind::TouchId
        } else {
            BiometricKind::Generic
        }
    }
}

/// Response of a biometric `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricSecret {
    pub success: bool,
    pub secret: Option<String>,
}

impl BiometricSecret {
    pub fn found(secret: impl Into<String>) -> Self {
        Self {
            success: true,
            secret: Some(secret.into()),
        }
    }
}

/// Biometric prompt and secure secret storage.
///
/// A dismissed prompt comes back as an `Err` whose message mentions
/// "cancel"; see [`BridgeError::is_cancellation`].
#[async_trait]
pub trait BiometricProvider: Send + Sync {
    async fn status(&self) -> Result<BiometricStatus, BridgeError>;

    /// Store `secret` behind the biometric prompt. Returns the host's
    /// success flag.
    async fn save(&self, secret: &str) -> Result<bool, BridgeError>;

    /// Prompt the user and return the stored secret.
    async fn get(&self) -> Result<BiometricSecret, BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefers_face_id() {
        let status = BiometricStatus {
            has_face_id: true,
            has_touch_id: true,
            has_saved_secret: false,
        };
        assert_eq!(status.kind(), BiometricKind::FaceId);
        assert!(status.is_available());
        assert_eq!(BiometricStatus::default().kind(), BiometricKind::Generic);
        assert!(!BiometricStatus::default().is_available());
    }

    #[test]
    fn status_reads_host_payload() {
        let status: BiometricStatus =
            serde_json::from_str(r#"{"hasFaceId":false,"hasTouchId":true,"hasSecret":true}"#)
                .unwrap();
        assert_eq!(status.kind(), BiometricKind::TouchId);
        assert!(status.has_saved_secret);
    }
}
