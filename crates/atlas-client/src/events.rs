//! Notifications pushed from the record store to the view layer.

use serde::Serialize;
use tokio::sync::mpsc;

use atlas_shared::ScreenChoice;

pub const EVENT_SCREEN_CHANGED: &str = "screen-changed";
pub const EVENT_ACTIVITIES_CHANGED: &str = "activities-changed";
pub const EVENT_PROFILE_CHANGED: &str = "profile-changed";
pub const EVENT_DEVICES_CHANGED: &str = "devices-changed";
pub const EVENT_AUTH_STATUS: &str = "auth-status";
pub const EVENT_SYSTEM_ARMED: &str = "system-armed";
pub const EVENT_PUSH_STATUS: &str = "push-status";
pub const EVENT_TOAST: &str = "toast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

/// Styling hint for the inline status line under the auth forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum UiEvent {
    ScreenChanged { screen: ScreenChoice },
    ActivitiesChanged { count: usize },
    ProfileChanged,
    DevicesChanged { count: usize },
    AuthStatus { text: String, tone: StatusTone },
    SystemArmed { armed: bool },
    PushStatus { registered: bool, subscriber_id: Option<String> },
    Toast { message: String, level: ToastLevel },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::ScreenChanged { .. } => EVENT_SCREEN_CHANGED,
            UiEvent::ActivitiesChanged { .. } => EVENT_ACTIVITIES_CHANGED,
            UiEvent::ProfileChanged => EVENT_PROFILE_CHANGED,
            UiEvent::DevicesChanged { .. } => EVENT_DEVICES_CHANGED,
            UiEvent::AuthStatus { .. } => EVENT_AUTH_STATUS,
            UiEvent::SystemArmed { .. } => EVENT_SYSTEM_ARMED,
            UiEvent::PushStatus { .. } => EVENT_PUSH_STATUS,
            UiEvent::Toast { .. } => EVENT_TOAST,
        }
    }
}

/// Sending half of the UI event stream. A disconnected sink drops events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<UiEvent>>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: UiEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        let name = event.name();
        if let Err(e) = tx.send(event) {
            tracing::error!(event = name, error = %e, "Failed to emit event");
        }
    }

    pub fn toast(&self, message: impl Into<String>, level: ToastLevel) {
        self.emit(UiEvent::Toast {
            message: message.into(),
            level,
        });
    }

    pub fn status(&self, text: impl Into<String>, tone: StatusTone) {
        self.emit(UiEvent::AuthStatus {
            text: text.into(),
            tone,
        });
    }
}
