use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Atlas Systems";

/// Prefix applied to every storage key unless configured otherwise
pub const DEFAULT_KEY_PREFIX: &str = "atlas_";

/// Delay before the biometric prompt fires on the unlock screen
pub const AUTO_PROMPT_DELAY: Duration = Duration::from_millis(600);

/// Artificial pacing for the demo password check
pub const SIGN_IN_DELAY: Duration = Duration::from_millis(800);

/// Artificial pacing for account creation
pub const SIGN_UP_DELAY: Duration = Duration::from_millis(500);

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

/// Number of activities shown on the dashboard
pub const DASHBOARD_ACTIVITY_LIMIT: usize = 10;

/// Location attached to activities produced by the app itself
pub const DEVICE_LOCATION: &str = "Mobile Device";

/// Location attached to arm/disarm activities
pub const CONTROL_PANEL_LOCATION: &str = "Control Panel";

/// Prompt shown before an activity is deleted
pub const CONFIRM_DELETE_ACTIVITY: &str = "Delete this security event?";

/// Prompt shown before a device is removed
pub const CONFIRM_REMOVE_DEVICE: &str = "Remove this device?";
