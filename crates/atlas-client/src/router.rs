//! Entry-screen routing.
//!
//! The rule is a fixed priority list over three persisted flags; the first
//! match wins.

use std::time::Duration;

use atlas_shared::ScreenChoice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFlags {
    pub account_exists: bool,
    pub biometric_saved: bool,
    pub device_exists: bool,
}

/// Screen to show while no session is active.
pub fn route(flags: EntryFlags) -> ScreenChoice {
    if flags.biometric_saved && flags.account_exists {
        ScreenChoice::BiometricUnlock
    } else if flags.account_exists {
        ScreenChoice::SignIn
    } else {
        ScreenChoice::SignUp
    }
}

/// Screen to show once a session starts.
pub fn post_auth_screen(device_onboarding: bool, device_exists: bool) -> ScreenChoice {
    if device_onboarding && !device_exists {
        ScreenChoice::AddDevice
    } else {
        ScreenChoice::Dashboard
    }
}

/// Result of routing, plus the follow-up the screen asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDecision {
    pub screen: ScreenChoice,
    /// Set on the biometric unlock screen: prompt automatically after this delay.
    pub auto_prompt_after: Option<Duration>,
    /// Email shown on the biometric unlock screen.
    pub saved_email: Option<String>,
}
