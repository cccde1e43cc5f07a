use tracing::info;

use atlas_shared::constants::CONTROL_PANEL_LOCATION;
use atlas_shared::ActivityType;

use crate::app::AtlasApp;
use crate::events::{ToastLevel, UiEvent};

impl AtlasApp {
    /// Flip the armed flag and record it. Returns the new state.
    pub async fn toggle_system_arm(&mut self) -> bool {
        self.state.system_armed = !self.state.system_armed;
        let armed = self.state.system_armed;
        let (status, verb) = if armed {
            ("Armed", "activated")
        } else {
            ("Disarmed", "deactivated")
        };

        self.log_activity(
            ActivityType::System,
            &format!("System {status}"),
            &format!("Security system {verb} manually"),
            Some(CONTROL_PANEL_LOCATION),
        )
        .await;

        info!(armed, "system arm toggled");
        self.events.emit(UiEvent::SystemArmed { armed });
        self.events.toast(
            format!("System {}", status.to_lowercase()),
            ToastLevel::Success,
        );
        armed
    }
}
