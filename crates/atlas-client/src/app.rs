//! The record store and session router.
//!
//! [`AtlasApp`] owns every in-memory record and the session flag. The view
//! layer drives it through the command methods (see [`crate::commands`]) and
//! listens to the [`EventSink`] for re-render hints. Handlers take
//! `&mut self`, so at most one runs at a time; wrap the app in a
//! `tokio::sync::Mutex` to share it across tasks, and schedule the unlock
//! screen's prompt with [`run_auto_prompt`] so the lock is free during the
//! delay.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use atlas_shared::{Account, AuthError, ScreenChoice, Session};
use atlas_store::LocalStorage;

use crate::bridge::{Confirm, HostBridge};
use crate::clock::{Clock, SystemClock};
use crate::commands::auth::Credentials;
use crate::config::ClientConfig;
use crate::events::{EventSink, UiEvent};
use crate::records::{RecordStore, StorageKey};
use crate::router::{self, EntryDecision, EntryFlags};
use crate::state::AppState;

pub struct AtlasApp {
    pub(crate) config: ClientConfig,
    pub(crate) state: AppState,
    pub(crate) records: RecordStore,
    pub(crate) bridge: HostBridge,
    pub(crate) confirm: Arc<dyn Confirm>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: EventSink,
}

impl AtlasApp {
    pub fn new(
        config: ClientConfig,
        local: Arc<dyn LocalStorage>,
        bridge: HostBridge,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let records = RecordStore::new(local, bridge.datastore.clone(), config.key_prefix.clone());
        Self {
            config,
            state: AppState::new(),
            records,
            bridge,
            confirm,
            clock: Arc::new(SystemClock),
            events: EventSink::disconnected(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn bridge(&self) -> &HostBridge {
        &self.bridge
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn screen(&self) -> ScreenChoice {
        self.state.screen
    }

    /// Detect host capabilities, load persisted records and pick the entry
    /// screen.
    pub async fn start(&mut self) -> EntryDecision {
        info!(
            host = self.bridge.is_host(),
            mirror = self.records.host_available(),
            "Atlas client starting"
        );

        self.init_biometrics().await;

        if self.config.push_enabled {
            if let Err(e) = self.init_push().await {
                warn!(error = %e, "push initialisation failed");
            }
        } else {
            debug!("push notifications disabled");
        }

        self.hydrate().await;
        self.determine_entry_screen()
    }

    pub fn determine_entry_screen(&mut self) -> EntryDecision {
        if let Some(account) = self.records.load_local::<Account>(StorageKey::Account) {
            self.state.saved_account = Some(account);
        }
        if self.state.saved_email.is_none() {
            self.state.saved_email = self.records.load_local(StorageKey::SavedEmail);
        }

        let flags = EntryFlags {
            account_exists: self.state.has_account(),
            biometric_saved: self.state.has_biometrics,
            device_exists: !self.state.devices.is_empty(),
        };
        let screen = router::route(flags);
        debug!(?flags, ?screen, "entry screen chosen");
        self.show(screen);

        let auto_prompt_after =
            (screen == ScreenChoice::BiometricUnlock).then_some(self.config.auto_prompt_delay);
        let saved_email = self.state.saved_email.clone().or_else(|| {
            self.state
                .saved_account
                .as_ref()
                .map(|account| account.email.clone())
        });

        EntryDecision {
            screen,
            auto_prompt_after,
            saved_email,
        }
    }

    /// Fire the scheduled biometric prompt now, unless the user has moved on.
    ///
    /// The caller waits out [`EntryDecision::auto_prompt_after`] without
    /// holding the app; see [`run_auto_prompt`].
    pub async fn run_due_auto_prompt(&mut self) -> Option<Result<Session, AuthError>> {
        if self.state.is_authenticated || self.state.screen != ScreenChoice::BiometricUnlock {
            debug!("auto prompt skipped, screen changed");
            return None;
        }
        Some(self.authenticate(Credentials::Biometric).await)
    }

    /// End the session. Persisted records are untouched.
    pub fn lock(&mut self) -> EntryDecision {
        self.state.is_authenticated = false;
        self.show(ScreenChoice::Locked);
        info!("session locked");
        self.determine_entry_screen()
    }

    pub(crate) async fn unlock(&mut self) {
        self.state.is_authenticated = true;

        self.reload_profile().await;
        self.reload_activities(self.config.seed_demo_activities).await;
        self.reload_devices().await;

        let screen = router::post_auth_screen(
            self.config.device_onboarding,
            !self.state.devices.is_empty(),
        );
        self.show(screen);
        self.emit_activities_changed();

        info!(?screen, activities = self.state.activities.len(), "session unlocked");
    }

    /// Load every mirrored record so that later mutations start from the
    /// persisted log rather than an empty one.
    pub(crate) async fn hydrate(&mut self) {
        self.reload_profile().await;
        self.reload_activities(false).await;
        self.reload_devices().await;
    }

    pub(crate) fn show(&mut self, screen: ScreenChoice) {
        self.state.screen = screen;
        self.events.emit(UiEvent::ScreenChanged { screen });
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Wait out the unlock screen's prompt delay, then fire the prompt.
///
/// The app lock is only taken once the delay has elapsed, so other UI
/// events (switching to the password form) get through in the meantime.
pub async fn run_auto_prompt(
    app: &Mutex<AtlasApp>,
    decision: &EntryDecision,
) -> Option<Result<Session, AuthError>> {
    let delay = decision.auto_prompt_after?;
    pace(delay).await;
    app.lock().await.run_due_auto_prompt().await
}

/// UX pacing delay. Zero means no suspension at all.
pub(crate) async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atlas_shared::{Activity, CredentialSecret};
    use atlas_store::{LocalStorage, LocalStorageExt, MemoryStorage};

    use super::*;
    use crate::bridge::{BiometricSecret, BiometricStatus, MemoryDatastore};
    use crate::commands::auth::SignUpForm;
    use crate::test_support::{harness, harness_over, start_time, MockBiometric};

    fn saved_account(local: &MemoryStorage) {
        local
            .set_json(
                "atlas_account",
                &serde_json::json!({"name": "Ada", "email": "ada@example.com", "createdAt": 0}),
            )
            .unwrap();
    }

    fn unlockable() -> Arc<MockBiometric> {
        let bio = Arc::new(MockBiometric::new(BiometricStatus {
            has_face_id: true,
            has_touch_id: false,
            has_saved_secret: true,
        }));
        let secret = CredentialSecret {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "engine1".into(),
            saved_at: start_time(),
        };
        bio.respond(Ok(BiometricSecret::found(secret.encode().unwrap())));
        bio
    }

    #[tokio::test]
    async fn fresh_install_routes_to_sign_up() {
        let mut h = harness(HostBridge::browser());
        let decision = h.app.start().await;
        assert_eq!(decision.screen, ScreenChoice::SignUp);
        assert_eq!(decision.auto_prompt_after, None);
        assert!(!h.app.is_authenticated());
    }

    #[tokio::test]
    async fn saved_account_routes_to_sign_in() {
        let mut h = harness(HostBridge::browser());
        saved_account(&h.local);
        let decision = h.app.start().await;
        assert_eq!(decision.screen, ScreenChoice::SignIn);
        assert_eq!(decision.saved_email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn undecodable_account_counts_as_absent() {
        let mut h = harness(HostBridge::browser());
        h.local.set_item("atlas_account", "{oops").unwrap();
        assert_eq!(h.app.start().await.screen, ScreenChoice::SignUp);
    }

    fn unlock_screen_harness() -> crate::test_support::Harness {
        let local = Arc::new(MemoryStorage::new());
        saved_account(&local);
        harness_over(
            ClientConfig::default(),
            HostBridge::browser().with_biometric(unlockable()),
            local,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn biometric_unlock_prompts_automatically() {
        let mut h = unlock_screen_harness();
        let decision = h.app.start().await;
        assert_eq!(decision.screen, ScreenChoice::BiometricUnlock);
        assert_eq!(decision.auto_prompt_after, Some(Duration::from_millis(600)));

        let app = Arc::new(Mutex::new(h.app));
        let started = tokio::time::Instant::now();
        let session = run_auto_prompt(&app, &decision).await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(600));
        assert_eq!(session.email, "ada@example.com");
        assert!(app.lock().await.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn app_stays_reachable_while_prompt_is_pending() {
        let mut h = unlock_screen_harness();
        let decision = h.app.start().await;
        let app = Arc::new(Mutex::new(h.app));

        let pending = tokio::spawn({
            let app = app.clone();
            let decision = decision.clone();
            async move { run_auto_prompt(&app, &decision).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let mut guard = tokio::time::timeout(Duration::from_millis(50), app.lock())
            .await
            .expect("app lock held during the prompt delay");
        guard.show_sign_in();
        drop(guard);

        assert!(pending.await.unwrap().is_none());
        let app = app.lock().await;
        assert!(!app.is_authenticated());
        assert_eq!(app.screen(), ScreenChoice::SignIn);
    }

    #[tokio::test]
    async fn due_prompt_only_fires_on_unlock_screen() {
        let mut h = unlock_screen_harness();
        h.app.start().await;
        h.app.show_sign_in();
        assert!(h.app.run_due_auto_prompt().await.is_none());

        let mut h = harness(HostBridge::browser());
        let decision = h.app.start().await;
        assert_eq!(decision.auto_prompt_after, None);
        assert!(h.app.run_due_auto_prompt().await.is_none());
    }

    #[tokio::test]
    async fn lock_keeps_records_and_reroutes() {
        let mut h = harness(HostBridge::browser());
        h.app.start().await;
        h.app
            .sign_up(SignUpForm::new("Ada", "ada@example.com", "engine1"))
            .await
            .unwrap();
        let before = h.local.get_item("atlas_activities").unwrap();

        let decision = h.app.lock();
        assert!(!h.app.is_authenticated());
        assert_eq!(decision.screen, ScreenChoice::SignIn);
        assert_eq!(h.local.get_item("atlas_activities").unwrap(), before);
    }

    #[tokio::test]
    async fn restart_reloads_log_from_local_storage() {
        let local = Arc::new(MemoryStorage::new());
        let mut first = harness_over(
            ClientConfig::default().without_delays(),
            HostBridge::browser(),
            local.clone(),
        );
        first.app.start().await;
        first
            .app
            .sign_up(SignUpForm::new("Ada", "ada@example.com", "engine1"))
            .await
            .unwrap();
        let log = first.app.state().activities.clone();

        let mut second = harness_over(
            ClientConfig::default().without_delays(),
            HostBridge::browser(),
            local,
        );
        assert_eq!(second.app.start().await.screen, ScreenChoice::SignIn);
        assert_eq!(second.app.state().activities, log);
    }

    #[tokio::test]
    async fn sqlite_storage_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::default().without_delays();
        let open = || -> Arc<dyn LocalStorage> {
            Arc::new(atlas_store::Database::open_in(dir.path()).unwrap())
        };

        let mut app = AtlasApp::new(
            config.clone(),
            open(),
            HostBridge::browser(),
            Arc::new(|_: &str| true),
        );
        app.start().await;
        app.sign_up(SignUpForm::new("Ada", "ada@example.com", "engine1"))
            .await
            .unwrap();
        let log = app.state().activities.clone();
        drop(app);

        let mut app = AtlasApp::new(
            config,
            open(),
            HostBridge::browser(),
            Arc::new(|_: &str| true),
        );
        let decision = app.start().await;
        assert_eq!(decision.screen, ScreenChoice::SignIn);
        assert_eq!(decision.saved_email.as_deref(), Some("ada@example.com"));
        assert_eq!(app.state().activities, log);
    }

    #[tokio::test]
    async fn host_copy_is_preferred_on_start() {
        let host = Arc::new(MemoryDatastore::new());
        let mirrored: Vec<Activity> = Vec::new();
        host.insert("atlas_activities", &serde_json::to_string(&mirrored).unwrap());

        let mut h = harness(HostBridge::browser().with_datastore(host.clone()));
        h.local
            .set_json(
                "atlas_activities",
                &serde_json::json!([{
                    "id": "local1",
                    "type": "door",
                    "title": "Back door",
                    "content": "Opened",
                    "createdAt": 1,
                    "updatedAt": 1
                }]),
            )
            .unwrap();

        h.app.start().await;
        assert!(h.app.state().activities.is_empty());

        host.set_fail_reads(true);
        h.app.hydrate().await;
        assert_eq!(h.app.state().activities[0].title, "Back door");
    }
}
