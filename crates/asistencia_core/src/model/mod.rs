//! Attendance domain model.
//!
//! # Responsibility
//! - Define the canonical attendee record and session classification.
//! - Provide tally projections shared by list, summary and report views.
//!
//! # Invariants
//! - Every attendee is identified by a stable `AttendeeId`.
//! - Session metadata and attendee list share one lifetime.

pub mod attendee;
pub mod session;
pub mod tally;
