use chrono::Duration;
use tracing::{debug, info};

use atlas_shared::constants::{
    CONFIRM_DELETE_ACTIVITY, CONTROL_PANEL_LOCATION, DASHBOARD_ACTIVITY_LIMIT,
};
use atlas_shared::display::{event_count_label, relative_time};
use atlas_shared::{Activity, ActivityId, ActivityInput, ActivityType, ValidationError};

use crate::app::AtlasApp;
use crate::config::TitlePolicy;
use crate::events::{ToastLevel, UiEvent};
use crate::records::StorageKey;

impl AtlasApp {
    /// Append an app-generated event to the log. Always succeeds.
    pub async fn log_activity(
        &mut self,
        kind: ActivityType,
        title: &str,
        content: &str,
        location: Option<&str>,
    ) -> Activity {
        let now = self.now();
        let activity = Activity {
            id: ActivityId::generate(now),
            kind,
            title: title.to_string(),
            content: content.to_string(),
            location: location.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        self.state.activities.insert(0, activity.clone());
        self.persist_activities().await;
        self.emit_activities_changed();

        debug!(id = %activity.id, title, "activity logged");
        activity
    }

    /// Create a record, or replace the one matching `existing`.
    ///
    /// Returns `Ok(None)` when `existing` names no record; nothing is
    /// written in that case.
    pub async fn upsert_activity(
        &mut self,
        input: ActivityInput,
        existing: Option<&ActivityId>,
    ) -> Result<Option<Activity>, ValidationError> {
        let input = match self.validate_activity(input) {
            Ok(input) => input,
            Err(e) => {
                self.events
                    .toast("Please fill in required fields", ToastLevel::Error);
                return Err(e);
            }
        };
        let now = self.now();

        let saved = match existing {
            Some(id) => {
                let Some(record) = self.state.activities.iter_mut().find(|a| &a.id == id) else {
                    debug!(id = %id, "edited activity no longer exists");
                    return Ok(None);
                };
                record.kind = input.kind;
                record.title = input.title;
                record.content = input.content;
                record.location = input.location;
                record.updated_at = now;
                let updated = record.clone();
                self.events.toast("Event updated", ToastLevel::Success);
                updated
            }
            None => {
                let created = Activity {
                    id: ActivityId::generate(now),
                    kind: input.kind,
                    title: input.title,
                    content: input.content,
                    location: input.location,
                    created_at: now,
                    updated_at: now,
                };
                self.state.activities.insert(0, created.clone());
                self.events.toast("Event logged", ToastLevel::Success);
                created
            }
        };

        self.persist_activities().await;
        self.emit_activities_changed();
        Ok(Some(saved))
    }

    fn validate_activity(&self, input: ActivityInput) -> Result<ActivityInput, ValidationError> {
        let mut input = input.normalized();
        if input.content.is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        if input.title.is_empty() {
            match self.config.title_policy {
                TitlePolicy::Required => return Err(ValidationError::MissingField("title")),
                TitlePolicy::DeriveFromType => {
                    input.title = input.kind.default_title().to_string();
                }
            }
        }
        Ok(input)
    }

    /// Remove one record after the user confirms. Returns whether anything
    /// was deleted.
    pub async fn delete_activity(&mut self, id: &ActivityId) -> bool {
        if !self.state.activities.iter().any(|a| &a.id == id) {
            debug!(id = %id, "no activity to delete");
            return false;
        }
        if !self.confirm.confirm(CONFIRM_DELETE_ACTIVITY) {
            return false;
        }

        self.state.activities.retain(|a| &a.id != id);
        self.persist_activities().await;
        self.emit_activities_changed();
        self.events.toast("Event deleted", ToastLevel::Success);
        info!(id = %id, "activity deleted");
        true
    }

    pub fn activity(&self, id: &ActivityId) -> Option<&Activity> {
        self.state.activities.iter().find(|a| &a.id == id)
    }

    /// Snapshot ordered by `updated_at`, newest first.
    pub fn sorted_activities(&self) -> Vec<Activity> {
        let mut sorted = self.state.activities.clone();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    /// The slice shown on the dashboard.
    pub fn recent_activities(&self) -> Vec<Activity> {
        let mut sorted = self.sorted_activities();
        sorted.truncate(DASHBOARD_ACTIVITY_LIMIT);
        sorted
    }

    pub fn activity_count_label(&self) -> String {
        event_count_label(self.state.activities.len())
    }

    pub fn activity_time_label(&self, activity: &Activity) -> String {
        relative_time(activity.updated_at, self.now())
    }

    pub(crate) async fn reload_activities(&mut self, seed: bool) {
        self.state.activities = self
            .records
            .load(StorageKey::Activities)
            .await
            .unwrap_or_default();

        if seed && self.state.activities.is_empty() {
            self.seed_demo_activities().await;
        }
    }

    async fn seed_demo_activities(&mut self) {
        let now = self.now();
        let demo = [
            (
                1,
                ActivityType::System,
                "System Armed",
                "Security system activated in Away mode",
                CONTROL_PANEL_LOCATION,
            ),
            (
                2,
                ActivityType::Door,
                "Front Door Locked",
                "Automatic lock engaged after 30 seconds",
                "Front Entrance",
            ),
            (
                3,
                ActivityType::Camera,
                "Camera Recording Started",
                "Motion-triggered recording on driveway camera",
                "Driveway",
            ),
        ];

        self.state.activities = demo
            .into_iter()
            .map(|(hours_ago, kind, title, content, location)| {
                let at = now - Duration::hours(hours_ago);
                Activity {
                    id: ActivityId::generate(at),
                    kind,
                    title: title.to_string(),
                    content: content.to_string(),
                    location: Some(location.to_string()),
                    created_at: at,
                    updated_at: at,
                }
            })
            .collect();

        info!("seeded demo activities");
        self.persist_activities().await;
    }

    /// Re-render hint, only while the dashboard is reachable.
    pub(crate) fn emit_activities_changed(&self) {
        if self.state.is_authenticated {
            self.events.emit(UiEvent::ActivitiesChanged {
                count: self.state.activities.len(),
            });
        }
    }

    async fn persist_activities(&self) {
        self.records
            .persist(StorageKey::Activities, &self.state.activities)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use atlas_store::{LocalStorage, LocalStorageExt};

    use super::*;
    use crate::bridge::HostBridge;
    use crate::config::ClientConfig;
    use crate::test_support::{drain, harness, harness_with, signed_in};

    fn camera(title: &str) -> ActivityInput {
        ActivityInput::new(ActivityType::Camera, title, "Motion on driveway")
            .with_location("Driveway")
    }

    #[tokio::test]
    async fn unlock_seeds_an_empty_log() {
        let mut h = harness(HostBridge::browser());
        h.app.start().await;
        h.app.unlock().await;

        let titles: Vec<_> = h
            .app
            .sorted_activities()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(
            titles,
            vec!["System Armed", "Front Door Locked", "Camera Recording Started"]
        );
        let stored: Vec<Activity> = h.local.get_json("atlas_activities").unwrap().unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(h.app.activity_time_label(&stored[0]), "1h ago");
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let config = ClientConfig {
            seed_demo_activities: false,
            ..ClientConfig::default()
        };
        let mut h = harness_with(config, HostBridge::browser());
        h.app.start().await;
        h.app.unlock().await;
        assert!(h.app.state().activities.is_empty());
        assert_eq!(h.app.activity_count_label(), "0 events");
    }

    #[tokio::test]
    async fn login_event_does_not_clobber_persisted_log() {
        let mut h = signed_in(HostBridge::browser()).await;
        h.app
            .upsert_activity(camera("Driveway"), None)
            .await
            .unwrap();
        let before = h.app.state().activities.len();

        h.app.lock();
        h.app
            .authenticate(crate::commands::auth::Credentials::password("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(h.app.state().activities.len(), before + 1);
        assert!(h.app.state().activities.iter().any(|a| a.title == "Driveway"));
    }

    #[tokio::test]
    async fn upsert_rejects_blank_fields() {
        let mut h = signed_in(HostBridge::browser()).await;
        let before = h.app.state().activities.clone();

        let err = h
            .app
            .upsert_activity(ActivityInput::new(ActivityType::Door, "   ", "Opened"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));

        let err = h
            .app
            .upsert_activity(ActivityInput::new(ActivityType::Door, "Back door", ""), None)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("content"));

        assert_eq!(h.app.state().activities, before);
    }

    #[tokio::test]
    async fn derive_title_policy_fills_in_title() {
        let config = ClientConfig {
            title_policy: TitlePolicy::DeriveFromType,
            ..ClientConfig::default()
        };
        let mut h = harness_with(config, HostBridge::browser());
        h.app.start().await;

        let saved = h
            .app
            .upsert_activity(ActivityInput::new(ActivityType::Door, "", "Back door opened"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.title, "Door Activity");
    }

    #[tokio::test]
    async fn edit_preserves_id_and_created_at() {
        let mut h = signed_in(HostBridge::browser()).await;
        let created = h
            .app
            .upsert_activity(camera("Driveway"), None)
            .await
            .unwrap()
            .unwrap();

        h.clock.advance(Duration::minutes(5));
        let edited = h
            .app
            .upsert_activity(
                ActivityInput::new(ActivityType::Sensor, "Garage", "Temperature spike"),
                Some(&created.id),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(edited.id, created.id);
        assert_eq!(edited.created_at, created.created_at);
        assert_eq!(edited.updated_at, created.created_at + Duration::minutes(5));
        assert_eq!(edited.kind, ActivityType::Sensor);
        assert_eq!(edited.location, None);
        assert_eq!(h.app.activity(&created.id), Some(&edited));

        let stored: Vec<Activity> = h.local.get_json("atlas_activities").unwrap().unwrap();
        assert!(stored.contains(&edited));
    }

    #[tokio::test]
    async fn repeated_edit_keeps_created_at_and_log_length() {
        let mut h = signed_in(HostBridge::browser()).await;
        let created = h
            .app
            .upsert_activity(camera("Driveway"), None)
            .await
            .unwrap()
            .unwrap();
        let len = h.app.state().activities.len();

        h.clock.advance(Duration::seconds(30));
        let first = h
            .app
            .upsert_activity(camera("Driveway"), Some(&created.id))
            .await
            .unwrap()
            .unwrap();
        h.clock.advance(Duration::seconds(30));
        let second = h
            .app
            .upsert_activity(camera("Driveway"), Some(&created.id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.created_at, created.created_at);
        assert_eq!(second.created_at, created.created_at);
        assert!(first.updated_at > created.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(h.app.state().activities.len(), len);

        let stored: Vec<Activity> = h.local.get_json("atlas_activities").unwrap().unwrap();
        assert_eq!(stored.len(), len);
    }

    #[tokio::test]
    async fn edit_of_unknown_id_is_a_no_op() {
        let mut h = signed_in(HostBridge::browser()).await;
        let before: Option<String> = h.local.get_item("atlas_activities").unwrap();

        let result = h
            .app
            .upsert_activity(camera("Driveway"), Some(&ActivityId::from("gone")))
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(h.local.get_item("atlas_activities").unwrap(), before);
    }

    #[tokio::test]
    async fn sorted_by_updated_at_descending() {
        let mut h = signed_in(HostBridge::browser()).await;
        let first = h
            .app
            .upsert_activity(camera("First"), None)
            .await
            .unwrap()
            .unwrap();
        h.clock.advance(Duration::minutes(1));
        h.app.upsert_activity(camera("Second"), None).await.unwrap();
        h.clock.advance(Duration::minutes(1));
        h.app
            .upsert_activity(camera("First again"), Some(&first.id))
            .await
            .unwrap();

        let sorted = h.app.sorted_activities();
        assert_eq!(sorted[0].title, "First again");
        assert_eq!(sorted[1].title, "Second");
        for pair in sorted.windows(2) {
            assert!(pair[0].updated_at >= pair[1].updated_at);
        }
    }

    #[tokio::test]
    async fn recent_activities_are_capped() {
        let mut h = signed_in(HostBridge::browser()).await;
        for i in 0..12 {
            h.clock.advance(Duration::seconds(1));
            h.app
                .log_activity(ActivityType::Motion, &format!("Motion {i}"), "Hallway", None)
                .await;
        }
        let recent = h.app.recent_activities();
        assert_eq!(recent.len(), DASHBOARD_ACTIVITY_LIMIT);
        assert_eq!(recent[0].title, "Motion 11");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut h = signed_in(HostBridge::browser()).await;
        let created = h
            .app
            .upsert_activity(camera("Driveway"), None)
            .await
            .unwrap()
            .unwrap();
        let count = h.app.state().activities.len();

        h.set_confirm(false);
        assert!(!h.app.delete_activity(&created.id).await);
        assert_eq!(h.app.state().activities.len(), count);
        assert_eq!(h.prompts(), vec![CONFIRM_DELETE_ACTIVITY.to_string()]);

        h.set_confirm(true);
        assert!(h.app.delete_activity(&created.id).await);
        assert_eq!(h.app.state().activities.len(), count - 1);
        assert!(h.app.activity(&created.id).is_none());

        let stored: Vec<Activity> = h.local.get_json("atlas_activities").unwrap().unwrap();
        assert!(stored.iter().all(|a| a.id != created.id));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_does_not_prompt() {
        let mut h = signed_in(HostBridge::browser()).await;
        assert!(!h.app.delete_activity(&ActivityId::from("gone")).await);
        assert!(h.prompts().is_empty());
    }

    #[tokio::test]
    async fn change_events_only_while_signed_in() {
        let mut h = harness(HostBridge::browser());
        h.app.start().await;
        drain(&mut h.events);

        h.app
            .log_activity(ActivityType::System, "Background", "Logged while locked", None)
            .await;
        assert!(!drain(&mut h.events)
            .iter()
            .any(|e| matches!(e, UiEvent::ActivitiesChanged { .. })));

        h.app.unlock().await;
        drain(&mut h.events);
        h.app
            .log_activity(ActivityType::System, "Foreground", "Logged while open", None)
            .await;
        assert!(drain(&mut h.events).contains(&UiEvent::ActivitiesChanged {
            count: h.app.state().activities.len()
        }));
    }
}
