//! # atlas-shared
//!
//! Domain types, error taxonomy and constants shared by the Atlas store and
//! client crates.

pub mod constants;
pub mod display;
pub mod error;
pub mod types;

pub use error::{AuthError, BridgeError, ValidationError};
pub use types::*;
