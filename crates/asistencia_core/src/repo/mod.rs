//! Repository layer for durable local state.
//!
//! # Responsibility
//! - Define the key-value slot contract used by the persistence mirror.
//! - Isolate SQLite query details from store/service orchestration.

pub mod slot_repo;
