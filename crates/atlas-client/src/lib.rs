//! # atlas-client
//!
//! Record store and session router for the Atlas Systems mobile client.
//!
//! The crate owns session state, persists every record to local storage
//! (mirroring selected keys to the host datastore when one exists) and
//! decides which top-level screen to present. Host capabilities are
//! injected through [`HostBridge`]; the view layer listens on the
//! [`EventSink`] channel.

pub mod app;
pub mod bridge;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod records;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

use tracing_subscriber::{fmt, EnvFilter};

pub use app::{run_auto_prompt, AtlasApp};
pub use bridge::HostBridge;
pub use commands::auth::{Credentials, SignUpForm};
pub use config::{ClientConfig, TitlePolicy};
pub use error::{PersistenceError, PushError};
pub use events::{EventSink, UiEvent};
pub use router::EntryDecision;
pub use state::AppState;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("atlas_client=debug,atlas_store=info,atlas_demo=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
