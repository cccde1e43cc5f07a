use tracing::info;

use atlas_shared::Profile;

use crate::app::AtlasApp;
use crate::events::{ToastLevel, UiEvent};
use crate::records::StorageKey;

impl AtlasApp {
    pub(crate) async fn reload_profile(&mut self) {
        if let Some(profile) = self.records.load::<Profile>(StorageKey::UserProfile).await {
            self.state.profile = profile;
        }
    }

    /// Profile snapshot for the settings form. Blank name and email are
    /// filled in from the account.
    pub fn profile(&self) -> Profile {
        let mut profile = self.state.profile.clone();
        if let Some(account) = &self.state.saved_account {
            if profile.name.is_empty() {
                profile.name = account.name.clone();
            }
            if profile.email.is_empty() {
                profile.email = account.email.clone();
            }
        }
        profile
    }

    /// Replace the whole profile.
    pub async fn save_profile(&mut self, profile: Profile) -> Profile {
        self.state.profile = profile.normalized();
        self.records
            .persist(StorageKey::UserProfile, &self.state.profile)
            .await;

        info!("profile saved");
        self.events.emit(UiEvent::ProfileChanged);
        self.events
            .toast("Profile saved successfully", ToastLevel::Success);
        self.state.profile.clone()
    }

    pub fn greeting(&self) -> String {
        let account = self.state.saved_account.as_ref();
        let name = Some(self.state.profile.name.as_str())
            .filter(|n| !n.is_empty())
            .or_else(|| account.map(|a| a.name.as_str()).filter(|n| !n.is_empty()));

        if let Some(first) = name.and_then(|n| n.split_whitespace().next()) {
            return format!("Welcome, {first}");
        }
        match account.map(|a| a.email_local_part()).filter(|l| !l.is_empty()) {
            Some(local) => format!("Welcome, {local}"),
            None => "Welcome".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atlas_shared::Account;
    use atlas_store::LocalStorageExt;

    use super::*;
    use crate::bridge::{HostBridge, MemoryDatastore};
    use crate::test_support::{drain, harness, signed_in};

    #[tokio::test]
    async fn save_trims_and_mirrors() {
        let host = Arc::new(MemoryDatastore::new());
        let mut h = signed_in(HostBridge::browser().with_datastore(host.clone())).await;
        drain(&mut h.events);

        let saved = h
            .app
            .save_profile(Profile {
                name: "  Ada King ".into(),
                email: "ada@example.com".into(),
                address: " 12 St James's Square ".into(),
                phone: Some("   ".into()),
                emergency_contact: Some("Charles".into()),
            })
            .await;

        assert_eq!(saved.name, "Ada King");
        assert_eq!(saved.address, "12 St James's Square");
        assert_eq!(saved.phone, None);

        let local: Profile = h.local.get_json("atlas_user_profile").unwrap().unwrap();
        assert_eq!(local, saved);
        let mirrored: Profile =
            serde_json::from_str(&host.peek("atlas_user_profile").unwrap()).unwrap();
        assert_eq!(mirrored, saved);

        let events = drain(&mut h.events);
        assert!(events.contains(&UiEvent::ProfileChanged));
        assert!(events.contains(&UiEvent::Toast {
            message: "Profile saved successfully".into(),
            level: ToastLevel::Success,
        }));
    }

    #[tokio::test]
    async fn profile_backfills_from_account() {
        let mut h = harness(HostBridge::browser());
        h.app.state.saved_account = Some(Account {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            created_at: h.clock_now(),
        });
        h.app.state.profile.address = "London".into();

        let profile = h.app.profile();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.address, "London");
    }

    #[tokio::test]
    async fn greeting_uses_first_name_then_email() {
        let mut h = harness(HostBridge::browser());
        assert_eq!(h.app.greeting(), "Welcome");

        h.app.state.saved_account = Some(Account {
            name: String::new(),
            email: "grace@navy.mil".into(),
            created_at: h.clock_now(),
        });
        assert_eq!(h.app.greeting(), "Welcome, grace");

        h.app.state.profile.name = "Grace Brewster Hopper".into();
        assert_eq!(h.app.greeting(), "Welcome, Grace");
    }
}
