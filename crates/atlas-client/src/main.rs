//! # atlas-demo
//!
//! Scripted walk through the record store against the on-disk database:
//! sign up (or sign in on later runs), log an event, print the dashboard,
//! toggle the alarm and lock again.
//!
//! `ATLAS_MIRROR=memory` attaches an in-process host datastore so the
//! mirrored write path is exercised too.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use atlas_client::bridge::{Confirm, MemoryDatastore};
use atlas_client::{AtlasApp, ClientConfig, Credentials, EventSink, HostBridge, SignUpForm};
use atlas_shared::{ActivityInput, ActivityType, ScreenChoice};
use atlas_store::Database;

const DEMO_NAME: &str = "Demo User";
const DEMO_EMAIL: &str = "demo@atlas.local";
const DEMO_PASSWORD: &str = "atlas123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    atlas_client::init_tracing();
    info!("Starting atlas-demo v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env();
    info!(?config, "Loaded configuration");

    let database = match &config.data_dir {
        Some(dir) => Database::open_in(dir),
        None => Database::new(),
    }
    .context("failed to open local database")?;
    if let Some(path) = database.path() {
        info!(path = %path.display(), "Local database opened");
    }

    let bridge = match std::env::var("ATLAS_MIRROR").as_deref() {
        Ok("memory") => HostBridge::browser().with_datastore(Arc::new(MemoryDatastore::new())),
        _ => HostBridge::browser(),
    };

    // Non-interactive: every confirmation is accepted.
    let confirm: Arc<dyn Confirm> = Arc::new(|prompt: &str| {
        info!(prompt, "auto-confirming");
        true
    });

    let (events, mut rx) = EventSink::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => println!("event {json}"),
                Err(e) => tracing::warn!(error = %e, "unprintable event"),
            }
        }
    });

    let mut app = AtlasApp::new(config, Arc::new(database), bridge, confirm).with_events(events);

    let decision = app.start().await;
    match decision.screen {
        ScreenChoice::SignUp => {
            app.sign_up(SignUpForm::new(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD))
                .await
                .context("demo sign-up rejected")?;
        }
        _ => {
            let email = decision
                .saved_email
                .unwrap_or_else(|| DEMO_EMAIL.to_string());
            app.authenticate(Credentials::password(email, DEMO_PASSWORD))
                .await
                .context("demo sign-in rejected")?;
        }
    }

    println!("{}", app.greeting());

    app.upsert_activity(
        ActivityInput::new(
            ActivityType::Motion,
            "Hallway Motion",
            "Movement detected near the stairs",
        )
        .with_location("Hallway"),
        None,
    )
    .await
    .context("demo activity rejected")?;

    println!("Recent activity ({}):", app.activity_count_label());
    for activity in app.recent_activities() {
        println!(
            "  [{:?}] {} - {} ({})",
            activity.kind,
            activity.title,
            activity.content,
            app.activity_time_label(&activity)
        );
    }

    let armed = app.toggle_system_arm().await;
    println!("System armed: {armed}");

    let decision = app.lock();
    println!("Locked, next screen: {:?}", decision.screen);

    drop(app);
    printer.await.context("event printer panicked")?;
    Ok(())
}
