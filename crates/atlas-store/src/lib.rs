//! # atlas-store
//!
//! Local durable storage for the Atlas client: a flat, synchronous string
//! key-value namespace scoped to the installation.
//!
//! [`Database`] keeps the namespace in a SQLite file; [`MemoryStorage`] keeps
//! it in a map for tests and for hosts without a writable data directory.
//! Both implement [`LocalStorage`], and [`LocalStorageExt`] adds JSON
//! helpers on top.

pub mod database;
pub mod kv;
pub mod memory;
pub mod migrations;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{LocalStorage, LocalStorageExt};
pub use memory::MemoryStorage;
