use tracing::{debug, info, warn};

use atlas_shared::constants::{APP_NAME, DEVICE_LOCATION, MIN_PASSWORD_LEN};
use atlas_shared::{
    Account, ActivityType, AuthError, AuthMethod, CredentialSecret, Profile, ScreenChoice,
    Session, ValidationError,
};

use crate::app::{pace, AtlasApp};
use crate::bridge::BiometricSecret;
use crate::events::{StatusTone, ToastLevel};
use crate::records::StorageKey;
use crate::state::AppState;

/// Status line when the prompt completed without handing back a credential.
const BIOMETRIC_RETRY_STATUS: &str = "Authentication failed. Try again.";

/// How the user is trying to get in.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Demo-only check: any email containing `@` with a non-empty password.
    Password {
        email: String,
        password: String,
        /// Also store the login behind the biometric prompt.
        remember_with_biometrics: bool,
    },
    Biometric,
}

impl Credentials {
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            email: email.into(),
            password: password.into(),
            remember_with_biometrics: false,
        }
    }

    pub fn remembered(self) -> Self {
        match self {
            Credentials::Password { email, password, .. } => Credentials::Password {
                email,
                password,
                remember_with_biometrics: true,
            },
            other => other,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Password {
                email,
                remember_with_biometrics,
                ..
            } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"<redacted>")
                .field("remember_with_biometrics", remember_with_biometrics)
                .finish(),
            Credentials::Biometric => f.write_str("Biometric"),
        }
    }
}

/// The sign-up form as submitted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub enable_biometrics: bool,
}

impl SignUpForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            enable_biometrics: false,
        }
    }

    pub fn with_biometrics(mut self) -> Self {
        self.enable_biometrics = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

impl AtlasApp {
    pub(crate) async fn init_biometrics(&mut self) {
        let Some(provider) = self.bridge.biometric.clone() else {
            debug!("no biometric provider, browser mode");
            return;
        };

        match provider.status().await {
            Ok(status) => {
                self.state.biometric_available = status.is_available();
                self.state.has_biometrics = status.has_saved_secret;
                self.state.biometric_kind = status.kind();
                info!(
                    available = self.state.biometric_available,
                    saved = self.state.has_biometrics,
                    kind = self.state.biometric_kind.label(),
                    "biometric status"
                );
            }
            Err(e) => warn!(error = %e, "biometric status unavailable"),
        }
    }

    /// Switch the lock screen to the password form.
    pub fn show_sign_in(&mut self) {
        if self.state.is_authenticated {
            debug!("already signed in, ignoring navigation");
            return;
        }
        self.show(ScreenChoice::SignIn);
    }

    /// Switch the lock screen to the sign-up form.
    pub fn show_sign_up(&mut self) {
        if self.state.is_authenticated {
            debug!("already signed in, ignoring navigation");
            return;
        }
        self.show(ScreenChoice::SignUp);
    }

    /// Create the installation's account and start a session.
    pub async fn sign_up(&mut self, form: SignUpForm) -> Result<Session, ValidationError> {
        if let Err(e) = form.validate() {
            self.events.status(e.to_string(), StatusTone::Error);
            return Err(e);
        }
        self.events.status("", StatusTone::Neutral);

        pace(self.config.sign_up_delay).await;

        let name = form.name.trim().to_string();
        let email = form.email.trim().to_string();

        if form.enable_biometrics && self.state.biometric_available {
            let label = self.state.biometric_kind.label();
            if self.save_biometric_credential(&name, &email, &form.password).await {
                self.events
                    .toast(format!("Account secured with {label}"), ToastLevel::Success);
            } else {
                self.events.toast("Biometric setup skipped", ToastLevel::Warning);
            }
        }

        let now = self.now();
        let account = Account {
            name: name.clone(),
            email: email.clone(),
            created_at: now,
        };
        self.records.persist_local(StorageKey::Account, &account);
        self.state.saved_account = Some(account);
        self.cache_saved_email(&email);

        self.state.profile = Profile {
            name: name.clone(),
            email: email.clone(),
            ..Profile::default()
        };
        self.records
            .persist(StorageKey::UserProfile, &self.state.profile)
            .await;

        self.log_activity(
            ActivityType::System,
            "Account Created",
            &format!("New {APP_NAME} account registered"),
            Some(DEVICE_LOCATION),
        )
        .await;

        info!(email = %email, "account created");
        self.unlock().await;
        self.events
            .toast(format!("Welcome to {APP_NAME}!"), ToastLevel::Success);

        Ok(Session {
            name,
            email,
            method: AuthMethod::Password,
            started_at: now,
        })
    }

    pub async fn authenticate(&mut self, credentials: Credentials) -> Result<Session, AuthError> {
        match credentials {
            Credentials::Password {
                email,
                password,
                remember_with_biometrics,
            } => {
                self.authenticate_password(&email, &password, remember_with_biometrics)
                    .await
            }
            Credentials::Biometric => self.authenticate_biometric().await,
        }
    }

    async fn authenticate_password(
        &mut self,
        email: &str,
        password: &str,
        remember_with_biometrics: bool,
    ) -> Result<Session, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.events
                .status("Please enter email and password", StatusTone::Error);
            return Err(AuthError::InvalidCredentials);
        }
        self.events.status("", StatusTone::Neutral);

        pace(self.config.sign_in_delay).await;

        if !email.contains('@') {
            let err = AuthError::InvalidCredentials;
            self.events.status(err.to_string(), StatusTone::Error);
            return Err(err);
        }

        let now = self.now();
        let mut account = self.state.saved_account.clone().unwrap_or(Account {
            name: String::new(),
            email: String::new(),
            created_at: now,
        });
        account.email = email.to_string();
        if account.name.is_empty() {
            account.name = account.email_local_part().to_string();
        }
        self.records.persist_local(StorageKey::Account, &account);
        self.state.saved_account = Some(account.clone());
        self.cache_saved_email(email);

        if remember_with_biometrics && self.state.biometric_available {
            let label = self.state.biometric_kind.label();
            if self
                .save_biometric_credential(&account.name, email, password)
                .await
            {
                self.events
                    .toast(format!("Login saved with {label}"), ToastLevel::Success);
            }
        }

        self.log_activity(
            ActivityType::System,
            "Password Login",
            "User authenticated with email/password",
            Some(DEVICE_LOCATION),
        )
        .await;

        info!(email = %email, "password login");
        self.unlock().await;
        self.events.toast("Welcome back!", ToastLevel::Success);

        Ok(Session {
            name: account.name,
            email: account.email,
            method: AuthMethod::Password,
            started_at: now,
        })
    }

    async fn authenticate_biometric(&mut self) -> Result<Session, AuthError> {
        let provider = match self.bridge.biometric.clone() {
            Some(provider) if self.state.biometric_available => provider,
            _ => {
                debug!("biometrics unavailable, falling back to password");
                self.show(ScreenChoice::SignIn);
                return Err(AuthError::Unavailable);
            }
        };

        self.events.status("Authenticating...", StatusTone::Neutral);

        let secret = match provider.get().await {
            Ok(BiometricSecret {
                success: true,
                secret: Some(secret),
            }) => secret,
            Ok(_) => {
                return Err(self.biometric_failed_with(
                    "host returned no credential",
                    BIOMETRIC_RETRY_STATUS,
                ))
            }
            Err(e) if e.is_cancellation() => {
                debug!(error = %e, "biometric prompt cancelled");
                let err = AuthError::Cancelled;
                self.events.status(err.to_string(), StatusTone::Neutral);
                return Err(err);
            }
            Err(e) => return Err(self.biometric_failed(&e.message)),
        };

        let credential = match CredentialSecret::decode(&secret) {
            Ok(credential) => credential,
            Err(e) => {
                return Err(self.biometric_failed(&format!("stored credential unreadable: {e}")))
            }
        };

        let now = self.now();
        let mut account = self.state.saved_account.clone().unwrap_or(Account {
            name: String::new(),
            email: String::new(),
            created_at: now,
        });
        account.email = credential.email.clone();
        account.name = credential.name.clone();
        self.state.saved_account = Some(account);

        self.events
            .status("Authentication successful!", StatusTone::Success);

        let kind = self.state.biometric_kind;
        self.log_activity(
            ActivityType::System,
            "Biometric Login",
            &format!("User authenticated via {}", kind.label()),
            Some(DEVICE_LOCATION),
        )
        .await;

        info!(email = %credential.email, kind = kind.label(), "biometric login");
        self.unlock().await;
        self.events
            .toast(format!("Welcome to {APP_NAME}"), ToastLevel::Success);

        Ok(Session {
            name: credential.name,
            email: credential.email,
            method: AuthMethod::Biometric(kind),
            started_at: now,
        })
    }

    fn biometric_failed(&mut self, reason: &str) -> AuthError {
        let status = AuthError::Failed(reason.to_string()).to_string();
        self.biometric_failed_with(reason, &status)
    }

    fn biometric_failed_with(&mut self, reason: &str, status: &str) -> AuthError {
        warn!(reason, "biometric authentication failed");
        self.events.status(status, StatusTone::Error);
        AuthError::Failed(reason.to_string())
    }

    /// Store the login behind the biometric prompt. Any failure just means
    /// the next sign-in uses the password form.
    async fn save_biometric_credential(&mut self, name: &str, email: &str, password: &str) -> bool {
        let Some(provider) = self.bridge.biometric.clone() else {
            return false;
        };
        if !self.state.biometric_available {
            return false;
        }

        let secret = CredentialSecret {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            saved_at: self.now(),
        };
        let encoded = match secret.encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode credential secret");
                return false;
            }
        };

        match provider.save(&encoded).await {
            Ok(true) => {
                self.state.has_biometrics = true;
                info!("credentials saved with biometrics");
                true
            }
            Ok(false) => {
                warn!("host declined to save biometric credential");
                false
            }
            Err(e) => {
                warn!(error = %e, "saving biometric credential failed");
                false
            }
        }
    }

    fn cache_saved_email(&mut self, email: &str) {
        self.records.persist_local(StorageKey::SavedEmail, email);
        self.state.saved_email = Some(email.to_string());
    }

    /// Remove every local record, blank the host copies and return to the
    /// sign-up form.
    pub async fn clear_account(&mut self) {
        for key in StorageKey::ALL {
            self.records.remove_local(key);
            self.records.clear_host(key).await;
        }

        self.state = AppState {
            biometric_available: self.state.biometric_available,
            biometric_kind: self.state.biometric_kind,
            push_registered: self.state.push_registered,
            subscriber_id: self.state.subscriber_id.take(),
            ..AppState::new()
        };

        info!("account cleared");
        self.show(ScreenChoice::SignUp);
        self.events.toast("Account cleared", ToastLevel::Success);
    }
}
