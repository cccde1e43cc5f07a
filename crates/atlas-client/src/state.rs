//! In-memory session state owned by [`AtlasApp`](crate::AtlasApp).

use atlas_shared::{Account, Activity, BiometricKind, Device, Profile, ScreenChoice};

/// Central application state.
///
/// The view layer only ever sees clones or borrowed slices of these fields.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sole gate for the dashboard. Never persisted.
    pub is_authenticated: bool,

    /// Screen currently presented.
    pub screen: ScreenChoice,

    /// Account loaded from local storage, `None` before sign-up.
    pub saved_account: Option<Account>,

    /// Email shown on the biometric unlock screen.
    pub saved_email: Option<String>,

    /// Whether the host holds a biometric-protected credential.
    pub has_biometrics: bool,

    /// Whether the device has usable biometric hardware.
    pub biometric_available: bool,

    pub biometric_kind: BiometricKind,

    pub profile: Profile,

    /// Activity log in insertion order, newest first.
    pub activities: Vec<Activity>,

    pub devices: Vec<Device>,

    pub system_armed: bool,

    pub push_registered: bool,

    pub subscriber_id: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            is_authenticated: false,
            screen: ScreenChoice::Locked,
            saved_account: None,
            saved_email: None,
            has_biometrics: false,
            biometric_available: false,
            biometric_kind: BiometricKind::Generic,
            profile: Profile::default(),
            activities: Vec::new(),
            devices: Vec::new(),
            system_armed: true,
            push_registered: false,
            subscriber_id: None,
        }
    }

    pub fn has_account(&self) -> bool {
        self.saved_account.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
