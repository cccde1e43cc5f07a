use tracing::{debug, info};
use uuid::Uuid;

use atlas_shared::constants::{CONFIRM_REMOVE_DEVICE, DEVICE_LOCATION};
use atlas_shared::{ActivityType, Device, DeviceStatus, ScreenChoice, ValidationError};

use crate::app::AtlasApp;
use crate::events::{ToastLevel, UiEvent};
use crate::records::StorageKey;

impl AtlasApp {
    pub fn devices(&self) -> &[Device] {
        &self.state.devices
    }

    pub fn device(&self, id: Uuid) -> Option<&Device> {
        self.state.devices.iter().find(|d| d.id == id)
    }

    pub(crate) async fn reload_devices(&mut self) {
        self.state.devices = self
            .records
            .load(StorageKey::Products)
            .await
            .unwrap_or_default();
    }

    /// Register an accessory by its printed product code.
    pub async fn add_device(&mut self, code: &str, name: &str) -> Result<Device, ValidationError> {
        let code = code.trim();
        let name = name.trim();
        if code.is_empty() {
            return Err(ValidationError::MissingField("code"));
        }
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        let device = Device {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            connected_at: self.now(),
            status: DeviceStatus::Online,
        };
        self.state.devices.push(device.clone());
        self.persist_devices().await;

        self.log_activity(
            ActivityType::System,
            "Device Connected",
            &format!("{name} ({code}) paired"),
            Some(DEVICE_LOCATION),
        )
        .await;

        info!(id = %device.id, code, "device added");
        if self.state.screen == ScreenChoice::AddDevice {
            self.show(ScreenChoice::Dashboard);
        }
        self.events.toast("Device connected", ToastLevel::Success);
        Ok(device)
    }

    pub async fn set_device_status(&mut self, id: Uuid, status: DeviceStatus) -> Option<Device> {
        let Some(device) = self.state.devices.iter_mut().find(|d| d.id == id) else {
            debug!(id = %id, "no such device");
            return None;
        };
        device.status = status;
        let updated = device.clone();

        self.persist_devices().await;
        debug!(id = %id, ?status, "device status changed");
        Some(updated)
    }

    pub async fn toggle_device_status(&mut self, id: Uuid) -> Option<Device> {
        let status = self.device(id)?.status.toggled();
        self.set_device_status(id, status).await
    }

    /// Remove a device after the user confirms.
    pub async fn remove_device(&mut self, id: Uuid) -> bool {
        if self.device(id).is_none() {
            debug!(id = %id, "no device to remove");
            return false;
        }
        if !self.confirm.confirm(CONFIRM_REMOVE_DEVICE) {
            return false;
        }

        self.state.devices.retain(|d| d.id != id);
        self.persist_devices().await;
        info!(id = %id, "device removed");
        self.events.toast("Device removed", ToastLevel::Success);
        true
    }

    async fn persist_devices(&self) {
        self.records
            .persist(StorageKey::Products, &self.state.devices)
            .await;
        self.events.emit(UiEvent::DevicesChanged {
            count: self.state.devices.len(),
        });
    }
}
