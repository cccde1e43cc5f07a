//! Client configuration loaded from environment variables.
//!
//! All settings have defaults matching the shipped web client, so the app can
//! start with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use atlas_shared::constants::{
    AUTO_PROMPT_DELAY, DEFAULT_KEY_PREFIX, SIGN_IN_DELAY, SIGN_UP_DELAY,
};

/// Which activity form fields are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePolicy {
    /// Both title and content must be filled in.
    #[default]
    Required,
    /// Only content is required; a blank title is derived from the type.
    DeriveFromType,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Directory holding the local database.
    /// Env: `ATLAS_DATA_DIR`
    /// Default: `None` (platform data directory).
    pub data_dir: Option<PathBuf>,

    /// Prefix applied to every local and host storage key.
    /// Env: `ATLAS_KEY_PREFIX`
    /// Default: `atlas_`
    pub key_prefix: String,

    /// Delay before the biometric prompt fires on the unlock screen.
    /// Env: `ATLAS_AUTO_PROMPT_MS`
    pub auto_prompt_delay: Duration,

    /// Artificial pacing before the demo password check.
    /// Env: `ATLAS_SIGN_IN_DELAY_MS`
    pub sign_in_delay: Duration,

    /// Artificial pacing before account creation.
    /// Env: `ATLAS_SIGN_UP_DELAY_MS`
    pub sign_up_delay: Duration,

    /// Seed three demo activities when the log is empty on unlock.
    /// Env: `ATLAS_SEED_DEMO` (true/false)
    /// Default: `true`
    pub seed_demo_activities: bool,

    /// Route to the add-device screen while no device is registered.
    /// Env: `ATLAS_DEVICE_ONBOARDING` (true/false)
    /// Default: `false`
    pub device_onboarding: bool,

    /// Env: `ATLAS_DERIVE_TITLES` (true selects [`TitlePolicy::DeriveFromType`])
    pub title_policy: TitlePolicy,

    /// Push registration is off until the host app is enrolled with a
    /// paid push provider account.
    /// Env: `ATLAS_PUSH_ENABLED` (true/false)
    /// Default: `false`
    pub push_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            auto_prompt_delay: AUTO_PROMPT_DELAY,
            sign_in_delay: SIGN_IN_DELAY,
            sign_up_delay: SIGN_UP_DELAY,
            seed_demo_activities: true,
            device_onboarding: false,
            title_policy: TitlePolicy::Required,
            push_enabled: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("ATLAS_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(prefix) = lookup("ATLAS_KEY_PREFIX") {
            config.key_prefix = prefix;
        }

        if let Some(delay) = parse_millis(&lookup, "ATLAS_AUTO_PROMPT_MS") {
            config.auto_prompt_delay = delay;
        }
        if let Some(delay) = parse_millis(&lookup, "ATLAS_SIGN_IN_DELAY_MS") {
            config.sign_in_delay = delay;
        }
        if let Some(delay) = parse_millis(&lookup, "ATLAS_SIGN_UP_DELAY_MS") {
            config.sign_up_delay = delay;
        }

        if let Some(val) = lookup("ATLAS_SEED_DEMO") {
            config.seed_demo_activities = parse_flag(&val);
        }

        if let Some(val) = lookup("ATLAS_DEVICE_ONBOARDING") {
            config.device_onboarding = parse_flag(&val);
        }

        if let Some(val) = lookup("ATLAS_DERIVE_TITLES") {
            config.title_policy = if parse_flag(&val) {
                TitlePolicy::DeriveFromType
            } else {
                TitlePolicy::Required
            };
        }

        if let Some(val) = lookup("ATLAS_PUSH_ENABLED") {
            config.push_enabled = parse_flag(&val);
        }

        config
    }

    /// Configuration with every UX delay removed.
    pub fn without_delays(mut self) -> Self {
        self.auto_prompt_delay = Duration::ZERO;
        self.sign_in_delay = Duration::ZERO;
        self.sign_up_delay = Duration::ZERO;
        self
    }
}

fn parse_flag(val: &str) -> bool {
    val != "false" && val != "0"
}

fn parse_millis(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(
                variable = name,
                value = %raw,
                "invalid millisecond value, using default"
            );
            None
        }
    }
}
