use std::sync::Arc;

use tracing::{info, warn};

use atlas_shared::constants::DEVICE_LOCATION;
use atlas_shared::{Activity, ActivityType};

use crate::app::AtlasApp;
use crate::bridge::{PushNotification, PushProvider};
use crate::error::PushError;
use crate::events::{ToastLevel, UiEvent};

impl AtlasApp {
    fn push_provider(&self) -> Result<Arc<dyn PushProvider>, PushError> {
        if !self.config.push_enabled {
            return Err(PushError::Disabled);
        }
        self.bridge.push.clone().ok_or(PushError::Unavailable)
    }

    /// Read the current registration from the host.
    pub(crate) async fn init_push(&mut self) -> Result<(), PushError> {
        let provider = self.push_provider()?;
        self.refresh_push_info(provider.as_ref()).await
    }

    pub async fn register_push(&mut self) -> Result<(), PushError> {
        let provider = match self.push_provider() {
            Ok(provider) => provider,
            Err(e) => {
                self.events.toast(e.to_string(), ToastLevel::Error);
                return Err(e);
            }
        };

        if let Err(e) = provider.register().await {
            warn!(error = %e, "push registration failed");
            let err = PushError::from(e);
            self.events.toast(err.to_string(), ToastLevel::Error);
            return Err(err);
        }
        self.refresh_push_info(provider.as_ref()).await?;

        if self.state.push_registered {
            self.events.toast("Alerts enabled", ToastLevel::Success);
        }
        Ok(())
    }

    async fn refresh_push_info(&mut self, provider: &dyn PushProvider) -> Result<(), PushError> {
        let info = provider.info().await?;
        self.state.push_registered = info.subscriber_id.is_some();
        self.state.subscriber_id = info.subscriber_id;

        info!(
            registered = self.state.push_registered,
            subscriber = self.state.subscriber_id.as_deref().unwrap_or("none"),
            "push status"
        );
        self.events.emit(UiEvent::PushStatus {
            registered: self.state.push_registered,
            subscriber_id: self.state.subscriber_id.clone(),
        });
        Ok(())
    }

    /// Record an inbound notification in the activity log.
    pub async fn handle_push_notification(&mut self, notification: PushNotification) -> Activity {
        let title = notification
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Notification")
            .to_string();

        self.events
            .toast(notification.body.clone(), ToastLevel::Success);
        self.log_activity(
            ActivityType::System,
            &title,
            &notification.body,
            Some(DEVICE_LOCATION),
        )
        .await
    }
}
