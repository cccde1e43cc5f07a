//! Hand-written host mocks and an app harness shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::mpsc::UnboundedReceiver;

use atlas_shared::BridgeError;
use atlas_store::MemoryStorage;

use crate::app::AtlasApp;
use crate::bridge::{
    BiometricProvider, BiometricSecret, BiometricStatus, Confirm, HostBridge, PushInfo,
    PushProvider,
};
use crate::clock::{Clock, ManualClock};
use crate::commands::auth::SignUpForm;
use crate::config::ClientConfig;
use crate::events::{EventSink, UiEvent};

pub struct MockBiometric {
    status: BiometricStatus,
    saved: Mutex<Vec<String>>,
    response: Mutex<Result<BiometricSecret, BridgeError>>,
    fail_saves: AtomicBool,
}

impl MockBiometric {
    pub fn new(status: BiometricStatus) -> Self {
        Self {
            status,
            saved: Mutex::new(Vec::new()),
            response: Mutex::new(Ok(BiometricSecret::default())),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Answer every following `get` with `response`.
    pub fn respond(&self, response: Result<BiometricSecret, BridgeError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl BiometricProvider for MockBiometric {
    async fn status(&self) -> Result<BiometricStatus, BridgeError> {
        Ok(self.status)
    }

    async fn save(&self, secret: &str) -> Result<bool, BridgeError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(BridgeError::new("keychain write refused"));
        }
        self.saved.lock().unwrap().push(secret.to_string());
        Ok(true)
    }

    async fn get(&self) -> Result<BiometricSecret, BridgeError> {
        self.response.lock().unwrap().clone()
    }
}

pub struct MockPush {
    subscriber: Mutex<Option<String>>,
    registrations: AtomicUsize,
}

impl MockPush {
    pub fn new(subscriber: Option<&str>) -> Self {
        Self {
            subscriber: Mutex::new(subscriber.map(str::to_string)),
            registrations: AtomicUsize::new(0),
        }
    }

    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushProvider for MockPush {
    async fn info(&self) -> Result<PushInfo, BridgeError> {
        Ok(PushInfo {
            subscriber_id: self.subscriber.lock().unwrap().clone(),
        })
    }

    async fn register(&self) -> Result<(), BridgeError> {
        let n = self.registrations.fetch_add(1, Ordering::SeqCst) + 1;
        let mut subscriber = self.subscriber.lock().unwrap();
        if subscriber.is_none() {
            *subscriber = Some(format!("sub-{n}"));
        }
        Ok(())
    }
}

pub struct Harness {
    pub app: AtlasApp,
    pub local: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub events: UnboundedReceiver<UiEvent>,
    confirm_answer: Arc<AtomicBool>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    pub fn set_confirm(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    /// Every confirmation prompt shown so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap()
}

/// App over in-memory storage with no UX delays.
pub fn harness(bridge: HostBridge) -> Harness {
    harness_with(ClientConfig::default(), bridge)
}

pub fn harness_with(config: ClientConfig, bridge: HostBridge) -> Harness {
    harness_over(config.without_delays(), bridge, Arc::new(MemoryStorage::new()))
}

/// Like [`harness_with`] but keeps the given delays and storage.
pub fn harness_over(
    config: ClientConfig,
    bridge: HostBridge,
    local: Arc<MemoryStorage>,
) -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let (sink, events) = EventSink::channel();

    let confirm_answer = Arc::new(AtomicBool::new(true));
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let confirm: Arc<dyn Confirm> = {
        let answer = confirm_answer.clone();
        let prompts = prompts.clone();
        Arc::new(move |prompt: &str| {
            prompts.lock().unwrap().push(prompt.to_string());
            answer.load(Ordering::SeqCst)
        })
    };

    let app = AtlasApp::new(config, local.clone(), bridge, confirm)
        .with_clock(clock.clone())
        .with_events(sink);

    Harness {
        app,
        local,
        clock,
        events,
        confirm_answer,
        prompts,
    }
}

/// A harness that has already signed up as Ada.
pub async fn signed_in(bridge: HostBridge) -> Harness {
    let mut h = harness(bridge);
    h.app.start().await;
    h.app
        .sign_up(SignUpForm::new("Ada Lovelace", "ada@example.com", "engine1"))
        .await
        .unwrap();
    drain(&mut h.events);
    h
}

pub fn drain(events: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
