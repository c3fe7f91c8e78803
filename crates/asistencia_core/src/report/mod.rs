//! Attendance report export.
//!
//! # Responsibility
//! - Build a paginated report document from the current attendee list.
//! - Render it as plain text or HTML and write it to disk on demand.
//!
//! # Invariants
//! - Exporting never mutates attendance state.

pub mod export;
