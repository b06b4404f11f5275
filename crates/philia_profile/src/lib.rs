//! # Philia Profile
//!
//! Aggregation of per-turn interaction metrics into a subject's persisted
//! rolling profile:
//!
//! - [`MetricsEngine`]: the read-analyze-merge-write cycle over any
//!   [`philia_core::MetricsStore`]
//! - [`SqliteProfiles`]: SQLite-backed profile store
//! - [`MemoryProfiles`]: in-memory store for tests and offline runs
//!
//! The engine makes no atomicity guarantee across its read-modify-write
//! sequence; concurrent updates for the same subject race and the later
//! write wins.

pub mod engine;
pub mod memory;
pub mod sqlite;

pub use engine::MetricsEngine;
pub use memory::{MemoryProfiles, ProfileRecord};
pub use sqlite::SqliteProfiles;
