//! Upload ingestion: raw CSV text to attendee names.
//!
//! # Responsibility
//! - Turn uploaded text into a non-empty list of trimmed names.
//! - Report user-facing failures without touching attendance state.

pub mod csv;
