//! Kinpath Storage - Storage backends for family graphs
//!
//! This crate persists persons and relationships and hands the core
//! consistent snapshots to search.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod migration;
pub mod reciprocal;
pub mod traits;

#[cfg(feature = "redb")]
pub mod redb;

pub mod memory;

pub use error::{StorageError, StorageResult};
pub use migration::{Migratable, SchemaVersion, CURRENT_VERSION};
pub use reciprocal::{relate, Related};
pub use traits::StorageBackend;

#[cfg(feature = "redb")]
pub use self::redb::RedbStorage;

pub use memory::MemoryStorage;
