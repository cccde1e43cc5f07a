//! Domain model structs persisted as JSON under the local storage keys.
//!
//! Field names serialize in camelCase and timestamps as integer
//! milliseconds, matching the blobs the web client keeps in local storage.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// The single account registered on this installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    pub email: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Part of the email before the `@`, used when no name was given.
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Editable user profile. Lives independently from [`Account`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl Profile {
    /// Trim every field and drop optional fields left blank.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: non_blank(self.phone),
            emergency_contact: non_blank(self.emergency_contact),
        }
    }
}

// ---------------------------------------------------------------------------
// Credential secret
// ---------------------------------------------------------------------------

/// Opaque blob handed to the host biometric provider.
///
/// The app only ever encodes it before `save` and decodes it after `get`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSecret {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

impl CredentialSecret {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(secret: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(secret)
    }
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn toggled(self) -> Self {
        match self {
            DeviceStatus::Online => DeviceStatus::Offline,
            DeviceStatus::Offline => DeviceStatus::Online,
        }
    }
}

/// A locally registered accessory (sensor, camera, hub).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Uuid,
    /// Product code printed on the accessory.
    pub code: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub connected_at: DateTime<Utc>,
    pub status: DeviceStatus,
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Motion,
    Door,
    Camera,
    Sensor,
    System,
    Scan,
    /// Also absorbs tags written by newer clients.
    #[serde(other)]
    Custom,
}

impl ActivityType {
    /// Title used when the form only asks for content.
    pub fn default_title(self) -> &'static str {
        match self {
            ActivityType::Motion => "Motion Detected",
            ActivityType::Door => "Door Activity",
            ActivityType::Camera => "Camera Event",
            ActivityType::Sensor => "Sensor Alert",
            ActivityType::System => "System Event",
            ActivityType::Scan => "Scan Completed",
            ActivityType::Custom => "Note",
        }
    }
}

/// Activity identifier: base-36 millisecond timestamp plus a random
/// base-36 suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ActivityId(pub String);

impl ActivityId {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let suffix: u64 = rand::thread_rng().gen();
        Self(format!("{}{}", to_base36(millis), to_base36(suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single entry in the security activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of an activity as submitted by the event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityInput {
    pub kind: ActivityType,
    pub title: String,
    pub content: String,
    pub location: Option<String>,
}

impl ActivityInput {
    pub fn new(kind: ActivityType, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Trim text fields; a blank location becomes `None`.
    pub fn normalized(self) -> Self {
        Self {
            kind: self.kind,
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            location: non_blank(self.location),
        }
    }
}

// ---------------------------------------------------------------------------
// Session & routing
// ---------------------------------------------------------------------------

/// Top-level screen presented by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenChoice {
    SignUp,
    SignIn,
    BiometricUnlock,
    AddDevice,
    Dashboard,
    Locked,
}

/// Biometric hardware reported by the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BiometricKind {
    FaceId,
    TouchId,
    #[default]
    Generic,
}

impl BiometricKind {
    pub fn label(self) -> &'static str {
        match self {
            BiometricKind::FaceId => "Face ID",
            BiometricKind::TouchId => "Touch ID",
            BiometricKind::Generic => "Biometrics",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AuthMethod {
    Password,
    Biometric(BiometricKind),
}

/// Proof that an authentication step succeeded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub email: String,
    pub method: AuthMethod,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
