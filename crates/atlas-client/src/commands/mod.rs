//! Command handlers invoked by the view layer.
//!
//! Each sub-module adds an `impl AtlasApp` block grouping related commands
//! by domain.

pub mod activities;
pub mod auth;
pub mod devices;
pub mod profile;
pub mod push;
pub mod system;
