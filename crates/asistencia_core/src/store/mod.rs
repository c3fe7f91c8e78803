//! In-memory attendance state and its durable mirror.
//!
//! # Responsibility
//! - Own the authoritative attendee list and session metadata.
//! - Notify observers synchronously after every mutation.
//! - Mirror state into one durable slot once the startup restore finished.
//!
//! # Invariants
//! - Records are only mutated through `AttendanceStore` methods.
//! - The mirror never writes before its one-shot restore has completed.

pub mod attendance_store;
pub mod mirror;
pub mod snapshot;
